//! HTTP response building module
//!
//! Builders for every response the edge router emits. Each one attaches the
//! configured `Access-Control-Allow-Origin`; only document responses carry
//! the security header set.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cache::CachePolicy;
use crate::config::CorsPolicy;

/// Response type produced by the router
pub type HttpResponse = Response<Full<Bytes>>;

/// Content type of the SPA root document
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

const PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

fn with_origin(builder: Builder, cors: &CorsPolicy) -> Builder {
    builder.header(header::ACCESS_CONTROL_ALLOW_ORIGIN, cors.allow_origin.clone())
}

fn with_headers(mut builder: Builder, headers: &[(HeaderName, HeaderValue)]) -> Builder {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

fn finish(builder: Builder, body: Bytes, label: &str) -> HttpResponse {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(label, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build CORS preflight response
pub fn build_preflight_response(cors: &CorsPolicy) -> HttpResponse {
    let builder = Response::builder()
        .status(cors.preflight_status)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, cors.allow_origin.clone())
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, cors.allow_methods.clone())
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, cors.allow_headers.clone())
        .header(header::ACCESS_CONTROL_MAX_AGE, cors.max_age.clone());
    finish(builder, Bytes::new(), "OPTIONS")
}

/// Build static asset response
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    cache: CachePolicy,
    cors: &CorsPolicy,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, cache.to_header_value());
    finish(with_origin(builder, cors), body, "asset")
}

/// Build SPA root document response
pub fn build_document_response(
    data: Bytes,
    etag: &str,
    cors: &CorsPolicy,
    security_headers: &[(HeaderName, HeaderValue)],
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, CachePolicy::NoCache.to_header_value());
    let builder = with_headers(with_origin(builder, cors), security_headers);
    finish(builder, body, "document")
}

/// Build 304 Not Modified response
pub fn build_304_response(
    etag: &str,
    cache: CachePolicy,
    cors: &CorsPolicy,
    extra_headers: &[(HeaderName, HeaderValue)],
) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, cache.to_header_value());
    let builder = with_headers(with_origin(builder, cors), extra_headers);
    finish(builder, Bytes::new(), "304")
}

/// Build 404 Not Found response
pub fn build_404_response(cors: &CorsPolicy) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, PLAIN_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, CachePolicy::NoCache.to_header_value());
    finish(with_origin(builder, cors), Bytes::from("404 Not Found"), "404")
}

/// Build plaintext error response that is never stored by caches
pub fn build_error_response(status: StatusCode, message: &str, cors: &CorsPolicy) -> HttpResponse {
    let builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, PLAIN_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, CachePolicy::NoStore.to_header_value());
    finish(
        with_origin(builder, cors),
        Bytes::from(message.to_string()),
        status.as_str(),
    )
}

/// Build 500 response carrying the configured fallback HTML page
pub fn build_fallback_page_response(
    page: Bytes,
    cors: &CorsPolicy,
    security_headers: &[(HeaderName, HeaderValue)],
) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, CachePolicy::NoStore.to_header_value());
    let builder = with_headers(with_origin(builder, cors), security_headers);
    finish(builder, page, "fallback page")
}

/// Build JSON response for built-in endpoints
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cors: &CorsPolicy,
) -> HttpResponse {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "500 Internal Server Error",
                cors,
            );
        }
    };

    let builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CACHE_CONTROL, CachePolicy::NoStore.to_header_value());
    finish(with_origin(builder, cors), Bytes::from(json), "JSON")
}

/// Log response build error
fn log_build_error(label: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {label} response: {error}"));
}
