//! Shelters domain - CRUD over shelter records.

pub mod models;
pub mod routes;

pub use models::Shelter;
