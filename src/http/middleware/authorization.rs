//! Authorization Gate Middleware.
//! Lets unsecured paths and pre-flight requests through; everything else
//! needs a principal from the security context repository.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::security::{Access, AuthorizationRules, SecurityContextRepository};

/// State required for the authorization gate.
#[derive(Clone)]
pub struct AuthorizationState {
    pub rules: Arc<AuthorizationRules>,
    pub contexts: Arc<dyn SecurityContextRepository>,
    /// Login entry point for unauthenticated requests; `None` answers 401.
    pub login_redirect: Option<String>,
}

pub async fn authorization_middleware(
    State(state): State<AuthorizationState>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Unsecured pattern or OPTIONS: no principal needed.
    if state.rules.evaluate(&req) == Access::Permit {
        metrics::record_authorization("permitted");
        return next.run(req).await;
    }

    // 2. Load the principal from the session.
    match state.contexts.load(req.headers()) {
        Some(principal) => {
            tracing::debug!(principal = %principal.name, path = %req.uri().path(), "Authenticated request");
            metrics::record_authorization("authenticated");
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "Rejected unauthenticated request");
            metrics::record_authorization("rejected");
            match &state.login_redirect {
                Some(target) => (StatusCode::FOUND, [(header::LOCATION, target.clone())]).into_response(),
                None => (StatusCode::UNAUTHORIZED, "Authentication required").into_response(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::build_unsecured_paths;
    use crate::security::{Principal, SessionContextRepository};
    use axum::{body::Body, http::Method, middleware, Router};
    use tower::ServiceExt;

    async fn whoami(req: Request) -> String {
        req.extensions()
            .get::<Principal>()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(contexts: Arc<SessionContextRepository>, login_redirect: Option<String>) -> Router {
        let rules = AuthorizationRules::new(&build_unsecured_paths(&["login", "assets/**"], &["shop/"]));
        let state = AuthorizationState {
            rules: Arc::new(rules),
            contexts,
            login_redirect,
        };
        Router::new()
            .fallback(whoami)
            .layer(middleware::from_fn_with_state(state, authorization_middleware))
    }

    fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unsecured_path_is_anonymous() {
        let app = app(Arc::new(SessionContextRepository::new("SESSION")), None);
        let response = app
            .oneshot(request(Method::GET, "/shop/login", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_protected_path_rejected_without_session() {
        let app = app(Arc::new(SessionContextRepository::new("SESSION")), None);
        let response = app
            .oneshot(request(Method::GET, "/orders", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_path_redirects_to_login() {
        let app = app(
            Arc::new(SessionContextRepository::new("SESSION")),
            Some("/oauth2/authorization/google".to_string()),
        );
        let response = app
            .oneshot(request(Method::GET, "/orders", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/oauth2/authorization/google"
        );
    }

    #[tokio::test]
    async fn test_session_principal_attached() {
        let contexts = Arc::new(SessionContextRepository::new("SESSION"));
        contexts.save("s1", Principal::new("alice"));

        let response = app(contexts, None)
            .oneshot(request(Method::GET, "/orders", Some("SESSION=s1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "alice");
    }

    #[tokio::test]
    async fn test_options_never_challenged() {
        let app = app(Arc::new(SessionContextRepository::new("SESSION")), None);
        for path in ["/", "/orders", "/shop/orders/42"] {
            let response = app
                .clone()
                .oneshot(request(Method::OPTIONS, path, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }
}
