//! Business logic: authentication and registration.

pub mod auth;

pub use auth::AuthService;
