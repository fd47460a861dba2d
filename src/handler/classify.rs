//! Route classification
//!
//! Turns method + path into a [`RouteDecision`]. Nothing else about the
//! request is consulted, so the same request always routes the same way for
//! a given configuration.

use hyper::Method;

use crate::config::RouterPolicy;

/// Built-in endpoint answered by the edge itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Liveness,
    Readiness,
    MessagingHandoff,
}

/// What the router does with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// CORS preflight, answered without looking at the path
    Preflight,
    /// Allow-listed asset, with its lowercase extension
    StaticAsset { extension: String },
    /// Client-side route, answered with the root document
    SpaFallback,
    Endpoint(Endpoint),
    /// Request target is not an absolute path
    Error,
}

impl RouteDecision {
    /// Short label used in access logs
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::StaticAsset { .. } => "asset",
            Self::SpaFallback => "spa",
            Self::Endpoint(Endpoint::Liveness | Endpoint::Readiness) => "health",
            Self::Endpoint(Endpoint::MessagingHandoff) => "handoff",
            Self::Error => "error",
        }
    }
}

/// Classify a request
///
/// `path` may still carry a query string; it is ignored.
pub fn classify(method: &Method, path: &str, policy: &RouterPolicy) -> RouteDecision {
    if *method == Method::OPTIONS {
        return RouteDecision::Preflight;
    }

    let path = path.split_once('?').map_or(path, |(p, _)| p);
    if !path.starts_with('/') {
        return RouteDecision::Error;
    }

    if let Some(endpoint) = match_endpoint(path, policy) {
        return RouteDecision::Endpoint(endpoint);
    }

    match asset_extension(path) {
        Some(extension) if policy.is_asset_extension(&extension) => {
            RouteDecision::StaticAsset { extension }
        }
        _ => RouteDecision::SpaFallback,
    }
}

fn match_endpoint(path: &str, policy: &RouterPolicy) -> Option<Endpoint> {
    let endpoints = &policy.endpoints;
    let is = |configured: &Option<String>| configured.as_deref() == Some(path);
    if is(&endpoints.liveness) {
        Some(Endpoint::Liveness)
    } else if is(&endpoints.readiness) {
        Some(Endpoint::Readiness)
    } else if is(&endpoints.handoff) {
        Some(Endpoint::MessagingHandoff)
    } else {
        None
    }
}

/// Lowercase extension of the last path segment
///
/// Dots in earlier segments never count (`/v1.2/resumen` has none), and a
/// segment that only starts with a dot (`/.env`) has none either.
pub fn asset_extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (stem, extension) = segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
