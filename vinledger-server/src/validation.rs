//! Request validation module
//!
//! Input shape checks that run before a request reaches the store.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Parse an id path segment the lenient way the web client expects:
/// leading whitespace and a `+` sign are skipped, then the leading run of
/// ASCII digits is taken (`"12abc"` is 12).
///
/// Returns `None` when no digits lead the segment, so the request simply
/// matches nothing.
pub fn parse_record_id(segment: &str) -> Option<u64> {
    let trimmed = segment.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().ok()
}

/// Unwrap a JSON body, replacing any extractor rejection with a fixed
/// client message.
pub fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &'static str,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
            Err(ApiError::bad_request(message))
        }
    }
}

/// Whether a loosely typed field counts as "provided": present, not null,
/// not `false`, not zero and not the empty string. Whitespace-only strings,
/// arrays and objects count.
pub fn is_provided(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
