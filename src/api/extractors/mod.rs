pub mod auth;
pub mod maybe_auth;
pub mod office;
