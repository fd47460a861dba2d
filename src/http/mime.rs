//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Generic binary type, also what storage backends report when they do not know better
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME Content-Type based on a lowercase file extension
///
/// # Examples
/// ```
/// use spa_edge::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("js")), "application/javascript");
/// assert_eq!(get_content_type(Some("woff2")), "font/woff2");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Documents and code
        Some("html" | "htm") => "text/html",
        Some("js" | "mjs") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("eot") => "application/vnd.ms-fontobject",

        _ => OCTET_STREAM,
    }
}

/// Whether an upstream Content-Type is specific enough to keep as-is
///
/// Empty values and generic binary types are replaced from the extension table.
pub fn is_unambiguous(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    !essence.is_empty() && essence != OCTET_STREAM && essence != "binary/octet-stream"
}
