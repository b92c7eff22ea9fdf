//! Auth domain - registration, login, and bearer-token identity.
//!
//! Responsibilities:
//! - Password storage (argon2id) and verification
//! - JWT issuance/verification
//! - User lookup for the auth middleware

pub mod jwt;
pub mod models;
pub mod password;
pub mod routes;

pub use jwt::{Claims, JwtService};
pub use models::{Role, User};
