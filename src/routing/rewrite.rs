//! Virtual-host default document resolution.
//!
//! Decides, per request, whether the path should be pointed at a host's
//! default document. The decision is pure apart from the resource lookup; the
//! HTTP wiring lives in `http::middleware::host_rewrite`.

use axum::http::{header, Method, Request};

use crate::resources::{ResourceError, ResourceIndex};

/// Default document appended to directory-style paths.
pub const INDEX_DOCUMENT: &str = "index.html";

/// The parts of a request the rewrite decision looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub host: String,
    pub path: String,
    pub method: Method,
}

impl RequestDescriptor {
    pub fn new(host: impl Into<String>, path: impl Into<String>, method: Method) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            method,
        }
    }

    /// Extract host, path and method from a request.
    ///
    /// Returns `None` when neither the Host header nor the URI carries a host.
    pub fn from_request<B>(req: &Request<B>) -> Option<Self> {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(host_name)
            .filter(|h| !h.is_empty())
            .or_else(|| req.uri().host())?;

        Some(Self::new(host, req.uri().path(), req.method().clone()))
    }

    /// A copy of this descriptor with the decision applied.
    pub fn apply(&self, decision: &RewriteDecision) -> Self {
        match decision {
            RewriteDecision::PassThrough => self.clone(),
            RewriteDecision::Matched { path, .. } => Self {
                host: self.host.clone(),
                path: path.clone(),
                method: self.method.clone(),
            },
        }
    }

    /// `/<host>/`, the home path of this virtual host.
    pub fn canonical_root(&self) -> String {
        format!("/{}/", self.host)
    }
}

/// Strip an optional port from a Host header value.
fn host_name(value: &str) -> &str {
    let value = value.trim();
    if value.starts_with('[') {
        // IPv6 literal: keep the brackets, drop what follows.
        return match value.find(']') {
            Some(end) => &value[..=end],
            None => value,
        };
    }
    match value.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => value,
    }
}

/// Outcome of the rewrite filter for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteDecision {
    /// Leave the request alone and set no header.
    PassThrough,
    /// Continue with `path` and answer with `Location: <location>`.
    ///
    /// `path` equals the original path when it had no trailing slash.
    Matched { path: String, location: String },
}

impl RewriteDecision {
    pub fn is_match(&self) -> bool {
        matches!(self, RewriteDecision::Matched { .. })
    }

    /// True when the path actually changes.
    pub fn rewrites(&self) -> bool {
        match self {
            RewriteDecision::PassThrough => false,
            RewriteDecision::Matched { path, location } => path != location,
        }
    }
}

/// Decide whether `request` must be pointed at its default document.
///
/// Matches when the path is exactly the host's canonical root or names a
/// bundled resource. Matching directory paths get the first `/<host>`
/// occurrence removed and `index.html` appended; other matching paths keep
/// their path. Either way the original path becomes the `Location` value.
pub fn decide(
    request: &RequestDescriptor,
    resources: &dyn ResourceIndex,
) -> Result<RewriteDecision, ResourceError> {
    let canonical_root = request.canonical_root();
    let is_root = request.path == canonical_root;

    tracing::info!(host = %request.host, "Resolved virtual host");

    let matched = is_root || resources.exists(&request.path)?;

    tracing::info!(
        path = %request.path,
        canonical_root = is_root,
        matched,
        "Evaluated default document rewrite"
    );

    if !matched {
        return Ok(RewriteDecision::PassThrough);
    }

    let path = if request.path.ends_with('/') {
        let host_segment = format!("/{}", request.host);
        let mut rewritten = request.path.replacen(&host_segment, "", 1);
        rewritten.push_str(INDEX_DOCUMENT);
        rewritten
    } else {
        request.path.clone()
    };

    Ok(RewriteDecision::Matched {
        path,
        location: request.path.clone(),
    })
}
