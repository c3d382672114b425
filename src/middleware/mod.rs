//! Middleware: payload logging with secret masking.

pub mod logging;

pub use logging::{log_payloads, redact};
