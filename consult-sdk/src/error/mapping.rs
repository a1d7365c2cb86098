//! Error mapping for upstream HTTP responses
//!
//! Converts non-success responses from the webhook, the spreadsheet script
//! and the secondary rating webhook into the normalized `ServiceError`.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};
use crate::util::truncate_string;

/// Longest body excerpt kept in error context
const BODY_EXCERPT_LEN: usize = 200;

/// Map a non-success HTTP response to a ServiceError
///
/// The error always carries the status code and reason phrase. The body is
/// only kept as context: n8n and Apps Script both answer errors with free
/// text or a `{message}`/`{error}` object.
pub fn map_http_error(
    status: StatusCode,
    body: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.status_code = Some(status.as_u16());

    let upstream_message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| extract_message(&json));

    if let Some(message) = upstream_message {
        context.add("upstream_message", truncate_string(&message, BODY_EXCERPT_LEN));
    } else if !body.trim().is_empty() {
        context.add("body", truncate_string(body.trim(), BODY_EXCERPT_LEN));
    }

    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    ServiceError::http(status.as_u16(), reason)
}

fn extract_message(json: &Value) -> Option<String> {
    if let Some(message) = json.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    match json.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        None => None,
    }
}
