//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: classification, dispatch to the
//! serving branch, the panic/error boundary and access logging.

use std::any::Any;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use hyper::body::Body as _;
use hyper::{header, Method, Request, StatusCode, Version};
use thiserror::Error;

use crate::config::{AppState, RouterPolicy};
use crate::handler::classify::{classify, RouteDecision};
use crate::handler::{endpoints, serve};
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use crate::storage::StorageError;

/// Faults that turn a request into a 500
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("request handler panicked: {0}")]
    Panic(String),
}

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self {
            method: req.method(),
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_str(req, header::IF_NONE_MATCH),
        }
    }
}

fn header_str<B>(req: &Request<B>, name: header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// Never fails: every fault is converted into a response here.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    let decision = classify(ctx.method, ctx.path, &state.policy);

    let response = dispatch(&ctx, &decision, &state).await;

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            ctx.method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.route = decision.label();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.referer = header_str(&req, header::REFERER).map(ToString::to_string);
        entry.user_agent = header_str(&req, header::USER_AGENT).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Produce the response for an already classified request
///
/// Runs the serving branch inside an unwind boundary so a panic or an error
/// surfaces as a 500 instead of tearing down the connection.
pub async fn dispatch(
    ctx: &RequestContext<'_>,
    decision: &RouteDecision,
    state: &AppState,
) -> HttpResponse {
    let outcome = AssertUnwindSafe(respond(ctx, decision, state))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(RouteError::Panic(panic_message(panic.as_ref()))));

    outcome.unwrap_or_else(|e| {
        logger::log_error(&format!(
            "{} {} ({}) failed: {e}",
            ctx.method,
            ctx.path,
            decision.label()
        ));
        internal_error(&state.policy, &e)
    })
}

async fn respond(
    ctx: &RequestContext<'_>,
    decision: &RouteDecision,
    state: &AppState,
) -> Result<HttpResponse, RouteError> {
    let policy = &state.policy;
    match decision {
        RouteDecision::Preflight => Ok(http::build_preflight_response(&policy.cors)),
        RouteDecision::StaticAsset { extension } => {
            serve::serve_asset(ctx, extension, state).await
        }
        RouteDecision::SpaFallback => Ok(serve::serve_root_document(ctx, state).await),
        RouteDecision::Endpoint(endpoint) => {
            Ok(endpoints::serve_endpoint(ctx, *endpoint, state).await)
        }
        RouteDecision::Error => {
            logger::log_warning(&format!("Unroutable request target: '{}'", ctx.path));
            Ok(http::build_error_response(
                StatusCode::BAD_REQUEST,
                "400 Bad Request",
                &policy.cors,
            ))
        }
    }
}

fn internal_error(policy: &RouterPolicy, error: &RouteError) -> HttpResponse {
    let message = if policy.expose_error_details {
        format!("500 Internal Server Error: {error}")
    } else {
        "500 Internal Server Error".to_string()
    };
    http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &message, &policy.cors)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MissingAssetPolicy};
    use crate::storage::{MemoryStore, Storage};
    use http_body_util::BodyExt;
    use hyper::body::Bytes;

    const INDEX: &str = "<!DOCTYPE html><html><body><div id=\"root\"></div></body></html>";

    fn site() -> MemoryStore {
        MemoryStore::new()
            .with_asset("index.html", INDEX)
            .with_asset("assets/app.3f2a.js", "console.log('app')")
            .with_asset("assets/style.css", "body{margin:0}")
            .with_asset("favicon.ico", vec![0u8, 0, 1, 0])
            .with_asset("img/hero.png", vec![0x89u8, b'P', b'N', b'G'])
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.logging.access_log = false;
        config
    }

    fn state_with(store: MemoryStore, config: Config) -> Arc<AppState> {
        Arc::new(AppState::new(config, Storage::memory(store)).unwrap())
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> HttpResponse {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> HttpResponse {
        send(state, Method::GET, uri).await
    }

    fn header<'r>(resp: &'r HttpResponse, name: &str) -> Option<&'r str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    async fn body(resp: HttpResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_hashed_script_is_immutable() {
        let state = state_with(site(), quiet_config());
        let resp = get(&state, "/assets/app.3f2a.js").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("application/javascript"));
        assert_eq!(
            header(&resp, "cache-control"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert!(header(&resp, "x-frame-options").is_none());
        assert_eq!(body(resp).await, Bytes::from("console.log('app')"));
    }

    #[tokio::test]
    async fn test_every_allowed_extension_gets_table_type() {
        let expected = [
            ("js", "application/javascript"),
            ("css", "text/css"),
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("ico", "image/x-icon"),
            ("svg", "image/svg+xml"),
            ("woff", "font/woff"),
            ("woff2", "font/woff2"),
            ("ttf", "font/ttf"),
            ("eot", "application/vnd.ms-fontobject"),
            ("json", "application/json"),
            ("webp", "image/webp"),
        ];
        let mut store = site();
        for (ext, _) in expected {
            store = store.with_asset(&format!("files/sample.{ext}"), "x");
        }
        let state = state_with(store, quiet_config());

        for (ext, content_type) in expected {
            let resp = get(&state, &format!("/files/sample.{ext}")).await;
            assert_eq!(resp.status(), StatusCode::OK, "{ext}");
            assert_eq!(header(&resp, "content-type"), Some(content_type), "{ext}");
        }
    }

    #[tokio::test]
    async fn test_other_assets_use_default_cache() {
        let state = state_with(site(), quiet_config());
        let resp = get(&state, "/img/hero.png").await;
        assert_eq!(header(&resp, "cache-control"), Some("public, max-age=3600"));
        let resp = get(&state, "/assets/style.css").await;
        assert_eq!(
            header(&resp, "cache-control"),
            Some("public, max-age=31536000, immutable")
        );
    }

    #[tokio::test]
    async fn test_client_route_gets_root_document() {
        let state = state_with(site(), quiet_config());
        let resp = get(&state, "/servicios").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=UTF-8"));
        assert_eq!(header(&resp, "cache-control"), Some("no-cache"));
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
        assert_eq!(header(&resp, "x-content-type-options"), Some("nosniff"));
        assert_eq!(
            header(&resp, "referrer-policy"),
            Some("strict-origin-when-cross-origin")
        );
        assert_eq!(body(resp).await, Bytes::from(INDEX));
    }

    #[tokio::test]
    async fn test_dotted_segment_is_not_an_asset() {
        let state = state_with(site(), quiet_config());
        let resp = get(&state, "/v1.2/resumen").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=UTF-8"));
        assert_eq!(body(resp).await, Bytes::from(INDEX));
    }

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        let state = state_with(site(), quiet_config());
        for path in ["/api/consultation", "/assets/app.3f2a.js", "/servicios"] {
            let resp = send(&state, Method::OPTIONS, path).await;
            assert_eq!(resp.status(), StatusCode::NO_CONTENT);
            assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
            assert_eq!(
                header(&resp, "access-control-allow-methods"),
                Some("GET, POST, OPTIONS")
            );
            assert_eq!(
                header(&resp, "access-control-allow-headers"),
                Some("Content-Type, Authorization")
            );
            assert_eq!(header(&resp, "access-control-max-age"), Some("86400"));
            assert!(body(resp).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_preflight_status_can_be_200() {
        let mut config = quiet_config();
        config.router.cors.preflight_status = 200;
        let state = state_with(site(), config);
        let resp = send(&state, Method::OPTIONS, "/api/consultation").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_asset_equals_spa_fallback() {
        let state = state_with(site(), quiet_config());
        let fallback = get(&state, "/servicios").await;
        let missing = get(&state, "/logo.svg").await;

        assert_eq!(missing.status(), fallback.status());
        assert_eq!(missing.headers(), fallback.headers());
        assert_eq!(body(missing).await, body(fallback).await);
    }

    #[tokio::test]
    async fn test_missing_asset_not_found_policy() {
        let mut config = quiet_config();
        config.router.missing_asset = MissingAssetPolicy::NotFound;
        let state = state_with(site(), config);
        let resp = get(&state, "/logo.svg").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    }

    #[tokio::test]
    async fn test_missing_root_document_is_500() {
        let store = site();
        let mut store = store;
        store.remove("index.html");
        let state = state_with(store, quiet_config());

        for path in ["/servicios", "/logo.svg", "/"] {
            let resp = get(&state, path).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
            assert_eq!(header(&resp, "cache-control"), Some("no-store"));
            assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
            assert!(header(&resp, "content-type").unwrap().starts_with("text/plain"));
            assert!(!body(resp).await.is_empty());
        }

        // Existing assets are still served
        let resp = get(&state, "/assets/style.css").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fallback_page_when_root_missing() {
        let mut config = quiet_config();
        config.router.fallback_page = Some("<h1>Back soon</h1>".to_string());
        let state = state_with(MemoryStore::new(), config);
        let resp = get(&state, "/contacto").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=UTF-8"));
        assert_eq!(header(&resp, "cache-control"), Some("no-store"));
        assert_eq!(body(resp).await, Bytes::from("<h1>Back soon</h1>"));
    }

    #[tokio::test]
    async fn test_storage_fault_is_scrubbed_500() {
        let state = state_with(site().unavailable("bucket offline"), quiet_config());
        let resp = get(&state, "/assets/app.3f2a.js").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header(&resp, "cache-control"), Some("no-store"));
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        let text = body(resp).await;
        assert_eq!(text, Bytes::from("500 Internal Server Error"));
    }

    #[tokio::test]
    async fn test_storage_fault_detail_when_exposed() {
        let mut config = quiet_config();
        config.router.expose_error_details = true;
        let state = state_with(site().unavailable("bucket offline"), config);

        let resp = get(&state, "/assets/app.3f2a.js").await;
        let text = String::from_utf8(body(resp).await.to_vec()).unwrap();
        assert!(text.contains("bucket offline"), "{text}");

        let resp = get(&state, "/servicios").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = String::from_utf8(body(resp).await.to_vec()).unwrap();
        assert!(text.contains("bucket offline"), "{text}");
    }

    #[tokio::test]
    async fn test_upstream_content_type() {
        let store = site()
            .with_typed_asset("data/feed.json", "{}", "application/ld+json")
            .with_typed_asset("data/raw.json", "{}", "application/octet-stream");
        let state = state_with(store, quiet_config());

        let resp = get(&state, "/data/feed.json").await;
        assert_eq!(header(&resp, "content-type"), Some("application/ld+json"));
        let resp = get(&state, "/data/raw.json").await;
        assert_eq!(header(&resp, "content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_query_and_case_do_not_change_routing() {
        let store = site().with_asset("img/LOGO.SVG", "<svg/>");
        let state = state_with(store, quiet_config());

        let resp = get(&state, "/assets/app.3f2a.js?v=2").await;
        assert_eq!(header(&resp, "content-type"), Some("application/javascript"));
        let resp = get(&state, "/img/LOGO.SVG").await;
        assert_eq!(header(&resp, "content-type"), Some("image/svg+xml"));
        let resp = get(&state, "/blog?file=post.js").await;
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=UTF-8"));
    }

    #[tokio::test]
    async fn test_conditional_requests() {
        let state = state_with(site(), quiet_config());
        let first = get(&state, "/assets/style.css").await;
        let etag = header(&first, "etag").unwrap().to_string();

        let req = Request::builder()
            .uri("/assets/style.css")
            .header("if-none-match", &etag)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(header(&resp, "etag"), Some(etag.as_str()));
        assert!(body(resp).await.is_empty());

        let doc = get(&state, "/servicios").await;
        let doc_etag = header(&doc, "etag").unwrap().to_string();
        let req = Request::builder()
            .uri("/otra-ruta")
            .header("if-none-match", &doc_etag)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(header(&resp, "cache-control"), Some("no-cache"));
        assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
    }

    #[tokio::test]
    async fn test_head_has_headers_without_body() {
        let state = state_with(site(), quiet_config());
        let resp = send(&state, Method::HEAD, "/servicios").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            header(&resp, "content-length"),
            Some(INDEX.len().to_string().as_str())
        );
        assert!(body(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_post_routes_like_get() {
        let state = state_with(site(), quiet_config());
        let resp = send(&state, Method::POST, "/contacto").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await, Bytes::from(INDEX));
    }

    #[tokio::test]
    async fn test_asterisk_target_is_bad_request() {
        let state = state_with(site(), quiet_config());
        let resp = get(&state, "*").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(header(&resp, "cache-control"), Some("no-store"));
    }

    #[tokio::test]
    async fn test_configured_origin_on_every_branch() {
        let mut config = quiet_config();
        config.router.cors.allow_origin = "https://abogada.example".to_string();
        let state = state_with(site(), config);

        for (method, path) in [
            (Method::OPTIONS, "/api/consultation"),
            (Method::GET, "/assets/app.3f2a.js"),
            (Method::GET, "/servicios"),
            (Method::GET, "/healthz"),
            (Method::GET, "*"),
        ] {
            let resp = send(&state, method, path).await;
            assert_eq!(
                header(&resp, "access-control-allow-origin"),
                Some("https://abogada.example"),
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = state_with(site(), quiet_config());
        let resp = get(&state, "/healthz").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await, Bytes::from(r#"{"status":"ok"}"#));

        let resp = get(&state, "/readyz").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let state = state_with(MemoryStore::new(), quiet_config());
        let resp = get(&state, "/readyz").await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(header(&resp, "cache-control"), Some("no-store"));
    }

    #[tokio::test]
    async fn test_disabled_health_paths_are_client_routes() {
        let mut config = quiet_config();
        config.health.enabled = false;
        let state = state_with(site(), config);
        let resp = get(&state, "/healthz").await;
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=UTF-8"));
    }

    #[tokio::test]
    async fn test_messaging_handoff_is_pending() {
        let mut config = quiet_config();
        config.handoff.contact_number = "+34 600 111 222".to_string();
        let state = state_with(site(), config);

        let resp = get(
            &state,
            "/api/checkout/messaging?service=Consulta&amount=60&reference=web-7",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("application/json"));
        let value: serde_json::Value = serde_json::from_slice(&body(resp).await).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["payment_id"], "web-7");
        assert_eq!(value["amount"], "60");
        assert!(value["deep_link"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/34600111222?text="));
        assert_eq!(
            value["confirmation_url"],
            "/confirmacion?payment_id=web-7&amount=60&status=pending&method=messaging"
        );

        let resp = get(&state, "/api/checkout/messaging?service=Consulta&amount=-1").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let value: serde_json::Value = serde_json::from_slice(&body(resp).await).unwrap();
        assert!(value["error"].as_str().unwrap().contains("invalid amount"));
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(boxed.as_ref()), "kaboom");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn test_internal_error_scrubbing() {
        let state = state_with(site(), quiet_config());
        let err = RouteError::Panic("index out of bounds".to_string());
        let resp = internal_error(&state.policy, &err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
    }

    #[tokio::test]
    async fn test_percent_encoded_asset_path() {
        let store = site().with_asset("img/niño abogada.jpg", vec![0xFFu8, 0xD8, 0xFF]);
        let state = state_with(store, quiet_config());

        let resp = get(&state, "/img/ni%C3%B1o%20abogada.jpg").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("image/jpeg"));
        assert_eq!(body(resp).await, Bytes::from(vec![0xFFu8, 0xD8, 0xFF]));

        // Undecodable keys are simply not found
        let resp = get(&state, "/img/bad%FF.jpg").await;
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=UTF-8"));
        assert_eq!(body(resp).await, Bytes::from(INDEX));
    }

    #[tokio::test]
    async fn test_panic_in_branch_is_scrubbed_500() {
        let state = state_with(site().panicking("asset index corrupted"), quiet_config());

        for path in ["/assets/app.3f2a.js", "/servicios", "/readyz"] {
            let resp = get(&state, path).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
            assert_eq!(header(&resp, "cache-control"), Some("no-store"));
            assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
            assert_eq!(body(resp).await, Bytes::from("500 Internal Server Error"));
        }

        // Preflight never reaches storage
        let resp = send(&state, Method::OPTIONS, "/servicios").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_panic_detail_when_exposed() {
        let mut config = quiet_config();
        config.router.expose_error_details = true;
        let state = state_with(site().panicking("asset index corrupted"), config);

        let resp = get(&state, "/assets/app.3f2a.js").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header(&resp, "cache-control"), Some("no-store"));
        let text = String::from_utf8(body(resp).await.to_vec()).unwrap();
        assert!(text.contains("asset index corrupted"), "{text}");
    }

    #[tokio::test]
    async fn test_fallback_page_carries_security_headers() {
        let mut config = quiet_config();
        config.router.fallback_page = Some("<h1>Back soon</h1>".to_string());
        let state = state_with(MemoryStore::new(), config);
        let resp = get(&state, "/contacto").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
        assert_eq!(header(&resp, "x-content-type-options"), Some("nosniff"));
        assert_eq!(
            header(&resp, "referrer-policy"),
            Some("strict-origin-when-cross-origin")
        );
    }
}
