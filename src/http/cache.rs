//! HTTP cache control module
//!
//! Provides `ETag` generation, conditional request handling and the
//! Cache-Control policies used for assets and documents.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}-{:x}\"", content.len())
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports single and comma-separated lists, weak validators (`W/"abc"`,
/// compared weakly as RFC 9110 requires for `If-None-Match`) and `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let ours = strip_weak(etag);
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| e == "*" || strip_weak(e) == ours)
    })
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Whether a file name carries a build fingerprint, e.g. `app.3f2a.js`,
/// `logo-4b8c21e.svg` or `index-B4x9kQ2z.css`
///
/// A fingerprint is a `.`, `-` or `_` separated token after the first one: a
/// hex digest of at least four characters mixing letters and digits, or a
/// base64-style digest of at least eight characters mixing upper case, lower
/// case and digits. Ordinary words with a digit (`2abogados`, `v2x1`) are not.
pub fn is_hashed_filename(file_name: &str) -> bool {
    let Some((stem, _ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    stem.split(['.', '-', '_'])
        .skip(1)
        .any(|token| is_hex_digest(token) || is_base64_digest(token))
}

fn is_hex_digest(token: &str) -> bool {
    token.len() >= 4
        && token.chars().all(|c| c.is_ascii_hexdigit())
        && token.chars().any(|c| c.is_ascii_digit())
        && token.chars().any(|c| c.is_ascii_alphabetic())
}

fn is_base64_digest(token: &str) -> bool {
    token.len() >= 8
        && token.chars().all(|c| c.is_ascii_alphanumeric())
        && token.chars().any(|c| c.is_ascii_digit())
        && token.chars().any(|c| c.is_ascii_uppercase())
        && token.chars().any(|c| c.is_ascii_lowercase())
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Public cache that never revalidates within max-age (fingerprinted assets)
    Immutable(u32),
    /// Cache but revalidate on every use
    NoCache,
    /// No store
    NoStore,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public(max_age) => write!(f, "public, max-age={max_age}"),
            Self::Immutable(max_age) => write!(f, "public, max-age={max_age}, immutable"),
            Self::NoCache => f.write_str("no-cache"),
            Self::NoStore => f.write_str("no-store"),
        }
    }
}
