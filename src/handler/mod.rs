//! Request handler module
//!
//! The edge router: classifies each request and serves a static asset, the
//! SPA root document, a CORS preflight answer or a built-in endpoint.

pub mod classify;
mod endpoints;
pub mod router;
mod serve;

// Re-export main entry point
pub use classify::{classify, Endpoint, RouteDecision};
pub use router::{dispatch, handle_request, RequestContext, RouteError};
