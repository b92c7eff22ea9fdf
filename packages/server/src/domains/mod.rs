// Business domains
pub mod auth;
pub mod capacity;
pub mod intake;
pub mod shelters;
