//! HTTP response building module
//!
//! Every response goes through [`builder`], which stamps the `Server` header and,
//! when enabled, the permissive cross-origin headers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";
const FALLBACK_BODY: &str = r#"{"error":"internal server error"}"#;

/// Response builder with the headers every response carries
fn builder(status: StatusCode, http: &HttpConfig) -> Builder {
    let builder = Response::builder()
        .status(status)
        .header("Server", http.server_name.as_str());

    if http.enable_cors {
        builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
    } else {
        builder
    }
}

/// Serialize `body` as JSON. HEAD keeps the headers and drops the body.
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let (status, json) = match serde_json::to_vec(body) {
        Ok(j) => (status, Bytes::from(j)),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(FALLBACK_BODY.as_bytes()),
            )
        }
    };

    let content_length = json.len();
    let body = if is_head { Bytes::new() } else { json };

    builder(status, http)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// `{"error": message}` with the given status
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    http: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_json_response(
        status,
        &serde_json::json!({ "error": message }),
        http,
        is_head,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = builder(StatusCode::NO_CONTENT, http).header("Allow", ALLOWED_METHODS);
    if http.enable_cors {
        builder = builder.header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut response =
        build_error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed", http, false);
    response.headers_mut().insert(
        hyper::header::ALLOW,
        hyper::header::HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}

/// Build 413 Payload Too Large response
pub fn build_413_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "payload too large", http, false)
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
