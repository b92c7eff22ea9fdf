// HTTP routes
pub mod root;

pub use root::*;
