// Shelter Capacity & Intake API - core library
//
// Shelters publish bed-capacity counts, the public submits intake requests,
// and shelter staff/admins triage them. Organized per-domain under domains/,
// with external collaborators (mail relay, Twilio SMS) in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
