pub mod auth;
pub mod cors;
pub mod errors;
pub mod health;
