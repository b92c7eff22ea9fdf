pub mod intake_request;

pub use intake_request::{IntakeFilter, IntakeRequest, IntakeStatus};
