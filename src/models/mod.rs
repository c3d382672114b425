//! Data models for users and applications.

pub mod user;

pub use user::*;
