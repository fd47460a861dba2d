//! Asset and root document serving
//!
//! The two storage-backed branches of the router. A missing asset falls back
//! to the root document unless the policy asks for 404; a missing root
//! document is the only fatal case and answers 500.

use crate::config::{AppState, MissingAssetPolicy, RouterPolicy};
use crate::handler::router::{RequestContext, RouteError};
use crate::http::{self, cache, mime, CachePolicy, HttpResponse};
use crate::logger;
use crate::storage::StoredAsset;
use hyper::StatusCode;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Serve an allow-listed asset from storage
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    extension: &str,
    state: &AppState,
) -> Result<HttpResponse, RouteError> {
    let policy = &state.policy;

    let asset = match storage_key(ctx.path) {
        Some(key) => state.storage.fetch(&key).await?,
        None => {
            logger::log_warning(&format!("Undecodable asset path: {}", ctx.path));
            None
        }
    };
    let Some(asset) = asset else {
        return Ok(match policy.missing_asset {
            MissingAssetPolicy::SpaFallback => {
                logger::log_debug(&format!(
                    "Asset not found, serving root document: {}",
                    ctx.path
                ));
                serve_root_document(ctx, state).await
            }
            MissingAssetPolicy::NotFound => http::build_404_response(&policy.cors),
        });
    };

    let StoredAsset {
        body,
        content_type: upstream,
    } = asset;
    let content_type = match upstream.as_deref() {
        Some(ct) if mime::is_unambiguous(ct) => ct,
        _ => policy.content_type_for(extension),
    };
    let cache_policy = policy.cache.for_asset(ctx.path, extension);
    let etag = cache::generate_etag(&body);

    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return Ok(http::build_304_response(&etag, cache_policy, &policy.cors, &[]));
    }

    Ok(http::build_asset_response(
        body,
        content_type,
        &etag,
        cache_policy,
        &policy.cors,
        ctx.is_head,
    ))
}

/// Storage key for a request path, percent-decoded.
///
/// `None` when the path is not valid UTF-8 once decoded or contains a NUL.
fn storage_key(path: &str) -> Option<Cow<'_, str>> {
    let key = percent_decode_str(path).decode_utf8().ok()?;
    if key.contains('\0') {
        return None;
    }
    Some(key)
}

/// Serve the SPA root document so the client-side router can resolve the path
pub async fn serve_root_document(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    let policy = &state.policy;

    let doc = match state.storage.fetch(&policy.root_document).await {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            logger::log_error(&format!(
                "Root document '{}' not found in {}",
                policy.root_document,
                state.storage.describe()
            ));
            return root_document_unavailable(policy, "root document not found");
        }
        Err(e) => {
            logger::log_error(&format!("Failed to load root document: {e}"));
            return root_document_unavailable(policy, &e.to_string());
        }
    };

    let etag = cache::generate_etag(&doc.body);
    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(
            &etag,
            CachePolicy::NoCache,
            &policy.cors,
            &policy.security_headers,
        );
    }

    http::build_document_response(
        doc.body,
        &etag,
        &policy.cors,
        &policy.security_headers,
        ctx.is_head,
    )
}

fn root_document_unavailable(policy: &RouterPolicy, detail: &str) -> HttpResponse {
    if let Some(page) = &policy.fallback_page {
        return http::build_fallback_page_response(
            page.clone(),
            &policy.cors,
            &policy.security_headers,
        );
    }
    let message = if policy.expose_error_details {
        format!("500 Internal Server Error: {detail}")
    } else {
        "500 Internal Server Error: application unavailable".to_string()
    };
    http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &message, &policy.cors)
}
