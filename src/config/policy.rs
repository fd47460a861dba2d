// Router policy module
// Compiles the router section of the configuration into validated, ready-to-use values

use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::StatusCode;
use std::collections::{HashMap, HashSet};

use super::types::{
    CacheConfig, Config, CorsConfig, HandoffConfig, HealthConfig, MissingAssetPolicy,
};
use crate::http::cache::{self, CachePolicy};
use crate::http::mime;

/// Everything the edge router needs to decide and shape a response.
///
/// Built once at startup by [`RouterPolicy::from_config`]; all header values are
/// parsed up front so request handling never re-validates configuration.
#[derive(Debug, Clone)]
pub struct RouterPolicy {
    /// Storage key of the SPA root document
    pub root_document: String,
    pub missing_asset: MissingAssetPolicy,
    pub expose_error_details: bool,
    pub fallback_page: Option<Bytes>,
    pub cors: CorsPolicy,
    pub cache: AssetCachePolicy,
    pub security_headers: Vec<(HeaderName, HeaderValue)>,
    pub endpoints: EndpointPaths,
    asset_extensions: HashSet<String>,
    content_types: HashMap<String, String>,
}

/// CORS headers shared by preflight answers and every final response
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub allow_origin: HeaderValue,
    pub allow_methods: HeaderValue,
    pub allow_headers: HeaderValue,
    pub max_age: HeaderValue,
    pub preflight_status: StatusCode,
}

/// Cache-Control selection per asset class
#[derive(Debug, Clone)]
pub struct AssetCachePolicy {
    immutable_extensions: HashSet<String>,
    hashed_filenames: bool,
    immutable: CachePolicy,
    default: CachePolicy,
}

/// Exact paths answered by built-in endpoints, `None` when disabled
#[derive(Debug, Clone, Default)]
pub struct EndpointPaths {
    pub liveness: Option<String>,
    pub readiness: Option<String>,
    pub handoff: Option<String>,
}

impl RouterPolicy {
    /// Validate the configuration and compile it into a policy.
    ///
    /// Collects every problem instead of stopping at the first one.
    pub fn from_config(config: &Config) -> Result<Self, Vec<String>> {
        let mut problems = Vec::new();
        let router = &config.router;

        let asset_extensions = normalize_extensions(
            &router.asset_extensions,
            "router.asset_extensions",
            &mut problems,
        );
        if asset_extensions.is_empty() {
            problems.push("router.asset_extensions must list at least one extension".to_string());
        }

        let mut content_types = HashMap::new();
        for (ext, content_type) in &router.content_types {
            let ext = normalize_extension(ext);
            if ext.is_empty() {
                problems.push("router.content_types contains an empty extension".to_string());
            } else if HeaderValue::from_str(content_type).is_err() {
                problems.push(format!(
                    "router.content_types.{ext}: invalid content type '{content_type}'"
                ));
            } else {
                content_types.insert(ext, content_type.clone());
            }
        }

        let root_document = config.storage.root_document.trim_start_matches('/').to_string();
        if root_document.is_empty() {
            problems.push("storage.root_document must not be empty".to_string());
        }

        let fallback_page = router
            .fallback_page
            .as_ref()
            .map(|page| Bytes::from(page.clone()));

        let cors = compile_cors(&router.cors, &mut problems);
        let cache = compile_cache(&router.cache, &mut problems);

        let mut security_headers = Vec::with_capacity(router.security_headers.len());
        for entry in &router.security_headers {
            match (
                HeaderName::from_bytes(entry.name.as_bytes()),
                HeaderValue::from_str(&entry.value),
            ) {
                (Ok(name), Ok(value)) => security_headers.push((name, value)),
                _ => problems.push(format!(
                    "router.security_headers: invalid header '{}: {}'",
                    entry.name, entry.value
                )),
            }
        }

        let endpoints = compile_endpoints(&config.health, &config.handoff, &mut problems);

        if !problems.is_empty() {
            return Err(problems);
        }

        Ok(Self {
            root_document,
            missing_asset: router.missing_asset,
            expose_error_details: router.expose_error_details,
            fallback_page,
            cors,
            cache,
            security_headers,
            endpoints,
            asset_extensions,
            content_types,
        })
    }

    /// Whether a lowercase extension is served from storage
    pub fn is_asset_extension(&self, extension: &str) -> bool {
        self.asset_extensions.contains(extension)
    }

    /// Content type for a lowercase extension, configured overrides first
    pub fn content_type_for(&self, extension: &str) -> &str {
        self.content_types
            .get(extension)
            .map_or_else(|| mime::get_content_type(Some(extension)), String::as_str)
    }

    /// Number of allow-listed extensions
    pub fn asset_extension_count(&self) -> usize {
        self.asset_extensions.len()
    }
}

impl AssetCachePolicy {
    /// Pick the cache policy for an asset path with its lowercase extension
    pub fn for_asset(&self, path: &str, extension: &str) -> CachePolicy {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        if self.immutable_extensions.contains(extension)
            || (self.hashed_filenames && cache::is_hashed_filename(file_name))
        {
            self.immutable
        } else {
            self.default
        }
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn normalize_extensions(raw: &[String], key: &str, problems: &mut Vec<String>) -> HashSet<String> {
    let mut set = HashSet::with_capacity(raw.len());
    for entry in raw {
        let ext = normalize_extension(entry);
        if ext.is_empty() || ext.contains(['.', '/']) {
            problems.push(format!("{key}: invalid extension '{entry}'"));
        } else {
            set.insert(ext);
        }
    }
    set
}

fn header_value(raw: &str, key: &str, problems: &mut Vec<String>) -> HeaderValue {
    HeaderValue::from_str(raw).unwrap_or_else(|_| {
        problems.push(format!("{key}: invalid header value '{raw}'"));
        HeaderValue::from_static("")
    })
}

fn compile_cors(cors: &CorsConfig, problems: &mut Vec<String>) -> CorsPolicy {
    if cors.allow_origin.trim().is_empty() {
        problems.push("router.cors.allow_origin must not be empty".to_string());
    }
    let preflight_status = match cors.preflight_status {
        200 => StatusCode::OK,
        204 => StatusCode::NO_CONTENT,
        other => {
            problems.push(format!(
                "router.cors.preflight_status must be 200 or 204, got {other}"
            ));
            StatusCode::NO_CONTENT
        }
    };

    CorsPolicy {
        allow_origin: header_value(&cors.allow_origin, "router.cors.allow_origin", problems),
        allow_methods: header_value(&cors.allow_methods, "router.cors.allow_methods", problems),
        allow_headers: header_value(&cors.allow_headers, "router.cors.allow_headers", problems),
        max_age: HeaderValue::from(cors.max_age),
        preflight_status,
    }
}

fn compile_cache(cache: &CacheConfig, problems: &mut Vec<String>) -> AssetCachePolicy {
    AssetCachePolicy {
        immutable_extensions: normalize_extensions(
            &cache.immutable_extensions,
            "router.cache.immutable_extensions",
            problems,
        ),
        hashed_filenames: cache.hashed_filenames,
        immutable: CachePolicy::Immutable(cache.immutable_max_age),
        default: CachePolicy::Public(cache.asset_max_age),
    }
}

fn endpoint_path(path: &str, key: &str, problems: &mut Vec<String>) -> Option<String> {
    if path.starts_with('/') {
        Some(path.to_string())
    } else {
        problems.push(format!("{key} must start with '/', got '{path}'"));
        None
    }
}

fn compile_endpoints(
    health: &HealthConfig,
    handoff: &HandoffConfig,
    problems: &mut Vec<String>,
) -> EndpointPaths {
    let mut endpoints = EndpointPaths::default();
    if health.enabled {
        endpoints.liveness = endpoint_path(&health.liveness_path, "health.liveness_path", problems);
        endpoints.readiness =
            endpoint_path(&health.readiness_path, "health.readiness_path", problems);
    }
    if handoff.enabled && !handoff.contact_number.trim().is_empty() {
        if !handoff.contact_number.chars().any(|c| c.is_ascii_digit()) {
            problems.push(format!(
                "handoff.contact_number contains no digits: '{}'",
                handoff.contact_number
            ));
        }
        endpoints.handoff = endpoint_path(&handoff.path, "handoff.path", problems);
    }
    endpoints
}
