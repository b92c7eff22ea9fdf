//! Intake domain - the request-for-placement lifecycle.
//!
//! Lifecycle: created by public submission as `pending`, then transitioned
//! by staff to `fulfilled` or `cancelled`. Rows are never deleted directly;
//! only a cascading shelter deletion removes them. The list, search, and
//! CSV-export endpoints all run through one `IntakeFilter` so their
//! predicates cannot drift.

pub mod models;
pub mod routes;

pub use models::{IntakeFilter, IntakeRequest, IntakeStatus};
