//! Host-Path Rewrite Middleware.
//! Points virtual-host root requests at their default document.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::resources::ResourceIndex;
use crate::routing::{decide, RequestDescriptor};

/// State required for the rewrite filter.
#[derive(Clone)]
pub struct HostRewriteState {
    pub resources: Arc<dyn ResourceIndex>,
}

/// The request path as it arrived, before any rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OriginalPath(pub String);

pub async fn host_rewrite_middleware(
    State(state): State<HostRewriteState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(descriptor) = RequestDescriptor::from_request(&req) else {
        tracing::debug!(path = %req.uri().path(), "No host on request, skipping rewrite");
        return next.run(req).await;
    };

    let decision = match decide(&descriptor, state.resources.as_ref()) {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(path = %descriptor.path, error = %e, "Static resource lookup failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    metrics::record_rewrite(&decision);

    if !decision.is_match() {
        return next.run(req).await;
    }

    let rewritten = descriptor.apply(&decision);
    let location = descriptor.path;

    if decision.rewrites() {
        match with_path(req.uri(), &rewritten.path) {
            Some(uri) => {
                tracing::debug!(from = %location, to = %rewritten.path, "Rewrote request path");
                *req.uri_mut() = uri;
            }
            None => {
                tracing::warn!(from = %location, to = %rewritten.path, "Rewritten path is not a valid URI, keeping original");
            }
        }
    }
    req.extensions_mut().insert(OriginalPath(location.clone()));

    let mut response = next.run(req).await;

    // Set as a plain header; the status is whatever the handler produced.
    if let Ok(value) = HeaderValue::from_str(&location) {
        response
            .headers_mut()
            .entry(header::LOCATION)
            .or_insert(value);
    }

    response
}

/// Replace the path of `uri`, keeping scheme, authority and query.
fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}
