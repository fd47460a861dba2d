//! HTTP protocol layer module
//!
//! MIME detection, cache validators and response builders, decoupled from the
//! routing decisions that use them.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use response::{
    build_304_response, build_404_response, build_asset_response, build_document_response,
    build_error_response, build_fallback_page_response, build_json_response,
    build_preflight_response, HttpResponse, HTML_CONTENT_TYPE,
};
