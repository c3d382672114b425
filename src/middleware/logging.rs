//! Request payload logging with secret masking.

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, Level};

use crate::error::AppError;

/// Keys whose values never reach the log.
const MASKED_KEYS: &[&str] = &["password", "pass", "secret"];
const MASK: &str = "***";

/// Same ceiling axum's `Json` extractor applies.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Replace the value of every masked key, at any depth, with `***`.
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if MASKED_KEYS.contains(&key.to_ascii_lowercase().as_str()) {
                    *v = Value::String(MASK.to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Middleware: log the received JSON payload (masked) and the response status
/// at debug level. A no-op when debug logging is off.
pub async fn log_payloads(request: Request, next: Next) -> Result<Response, AppError> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::InvalidInput(format!("request body: {}", e)))?;

    if let Ok(mut payload) = serde_json::from_slice::<Value>(&bytes) {
        redact(&mut payload);
        debug!(method = %parts.method, path = %parts.uri.path(), payload = %payload, "payload received");
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    debug!(status = %response.status(), "payload sent");
    Ok(response)
}
