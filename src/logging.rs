//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// The number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest JSON request body the middleware will buffer.
const JSON_BODY_BUFFER_LIMIT: usize = 1024 * 1024;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level. Only JSON
/// bodies are read; `password` fields in request bodies are redacted. Other
/// bodies, such as multipart uploads and served images, are passed through
/// untouched and only their headers are logged.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full text is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request = if is_json(request.headers()) {
        let (parts, body) = request.into_parts();
        let body_bytes = match to_bytes(body, JSON_BODY_BUFFER_LIMIT).await {
            Ok(body_bytes) => body_bytes,
            Err(error) => {
                tracing::warn!("Could not read JSON request body: {error}");
                return Error::PayloadTooLarge(JSON_BODY_BUFFER_LIMIT).into_response();
            }
        };

        log_request(&parts, &redact_password(&body_bytes));
        Request::from_parts(parts, Body::from(body_bytes))
    } else {
        tracing::info!("Received request: {:#?}", request);
        request
    };

    let response = next.run(request).await;

    if !is_json(response.headers()) {
        tracing::info!("Sending response: {:#?}", response);
        return response;
    }

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));
    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

/// Render a JSON body as text with every `password` field replaced.
///
/// Bodies that are not valid JSON are not shown at all, since they could hold
/// a password that cannot be found reliably.
fn redact_password(body: &Bytes) -> String {
    if body.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(mut value) => {
            redact_value(&mut value);
            value.to_string()
        }
        Err(_) => format!("<invalid JSON, {} bytes>", body.len()),
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key == "password" {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

fn truncate(body: &str) -> Option<String> {
    let mut chars = body.char_indices();

    chars
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| body[..end].to_owned())
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {headers:#?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {headers:#?}\nbody: {body:?}"),
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {headers:#?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {headers:#?}\nbody: {body:?}"),
    }
}
