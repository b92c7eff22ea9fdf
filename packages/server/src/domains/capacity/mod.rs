//! Capacity domain - append-only bed-capacity log per shelter.
//!
//! "Current capacity" is the most recent log row; there is no maintained
//! snapshot column, readers take the first row of the latest-20 response.

pub mod models;
pub mod routes;

pub use models::CapacityLog;
