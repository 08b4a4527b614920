use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, header};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use std::time::Instant;

use crate::error::ApiError;
use crate::state::AppState;

const REDACTED: &str = "[REDACTED]";

/// JSON keys whose values never reach the log, compared case-insensitively.
const SENSITIVE_FIELDS: [&str; 10] = [
    "password",
    "oldpassword",
    "newpassword",
    "token",
    "authorization",
    "secret",
    "jwtsecret",
    "privatekey",
    "notaryprivatekey",
    "adminpassword",
];

const SENSITIVE_HEADERS: [header::HeaderName; 3] =
    [header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE];

/// Bodies above this size are logged as a length only.
const MAX_LOGGED_BODY: usize = 16 * 1024;

fn is_quiet_path(path: &str) -> bool {
    path == "/health" || path.starts_with("/swagger-ui") || path.starts_with("/api-docs")
}

fn is_sensitive_field(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();
    SENSITIVE_FIELDS.contains(&normalized.as_str())
}

/// Masks credentials anywhere in a JSON document.
fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if is_sensitive_field(&key) {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    for name in SENSITIVE_HEADERS {
        if headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }
    headers
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Renders a captured body for the log line.
fn loggable_body(headers: &HeaderMap, bytes: &Bytes) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    if bytes.len() > MAX_LOGGED_BODY || !is_json(headers) {
        let mut summary = Map::new();
        summary.insert("bytes".to_string(), Value::from(bytes.len()));
        return Value::Object(summary);
    }
    serde_json::from_slice::<Value>(bytes)
        .map(redact)
        .unwrap_or(Value::Null)
}

async fn buffer_body(direction: &str, body: Body) -> Result<Bytes, ApiError> {
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|err| ApiError::BadRequest(format!("failed to read {direction} body: {err}")))
}

/// Logs one line per request with redacted headers and JSON bodies.
/// Response bodies are captured for writes only.
pub async fn http_logger(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_quiet_path(req.uri().path()) || req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let req_headers = req.headers().clone();
    let request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let (parts, body) = req.into_parts();
    let req_bytes = buffer_body("request", body).await?;
    let req_body = loggable_body(&req_headers, &req_bytes);

    let response = next
        .run(Request::from_parts(parts, Body::from(req_bytes)))
        .await;
    let latency = started.elapsed();
    let status = response.status();

    let (response, res_body) = if matches!(method, Method::POST | Method::PUT | Method::DELETE) {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let logged = loggable_body(&parts.headers, &bytes);
        (Response::from_parts(parts, Body::from(bytes)), logged)
    } else {
        (response, Value::Null)
    };

    if status.is_server_error() {
        tracing::error!(
            %method,
            path = %uri.path(),
            request_id = %request_id,
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            req_body = %req_body,
            app_env = %state.config.app_env,
            "HTTP request failed"
        );
    } else {
        tracing::info!(
            %method,
            uri = %uri,
            request_id = %request_id,
            req_headers = ?redact_headers(&req_headers),
            req_body = %req_body,
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            res_body = %res_body,
            app_env = %state.config.app_env,
            "HTTP request completed"
        );
    }

    Ok(response)
}
