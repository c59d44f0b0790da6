//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the static resource fallback
//! - Wire up the ordered request stages (tracing, request ID, metrics,
//!   timeout, authorization gate, host-path rewrite)
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::http::middleware::{
    authorization_middleware, host_rewrite_middleware, metrics_middleware, AuthorizationState,
    HostRewriteState,
};
use crate::http::request::{make_request_span, MakeRequestUuid};
use crate::lifecycle::{shutdown, Gateway};
use crate::security::SessionContextRepository;

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    contexts: Arc<SessionContextRepository>,
}

impl GatewayServer {
    /// Create a new HTTP server from assembled components.
    pub fn new(gateway: Gateway) -> Self {
        let router = Self::build_router(&gateway);
        Self {
            router,
            contexts: gateway.contexts,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Stages run top to bottom; the rewrite filter is always last before
    /// the static resource server.
    #[allow(deprecated)]
    fn build_router(gateway: &Gateway) -> Router {
        let authorization = AuthorizationState {
            rules: gateway.rules.clone(),
            contexts: gateway.contexts.clone(),
            login_redirect: gateway.config.security.login_redirect.clone(),
        };
        let rewrite = HostRewriteState {
            resources: gateway.resources.clone(),
        };

        let static_files = ServeDir::new(&gateway.static_dir).append_index_html_on_directories(false);

        let stages = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(axum::middleware::from_fn(metrics_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(
                gateway.config.timeouts.request_secs,
            )))
            .layer(axum::middleware::from_fn_with_state(
                authorization,
                authorization_middleware,
            ))
            .layer(axum::middleware::from_fn_with_state(
                rewrite,
                host_rewrite_middleware,
            ));

        Router::new().fallback_service(static_files).layer(stages)
    }

    /// The assembled router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Session store the login flow records principals in.
    pub fn contexts(&self) -> Arc<SessionContextRepository> {
        self.contexts.clone()
    }

    /// Run the server until `shutdown_rx` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::lifecycle::assemble;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::path::Path;
    use tower::ServiceExt;

    fn server() -> GatewayServer {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/static");
        let mut config = GatewayConfig::default();
        config.static_files.location = dir.to_string_lossy().into_owned();
        config.static_files.resource_root = dir.to_string_lossy().into_owned();
        config.static_files.paths = vec!["".into(), "index.html".into()];
        config.static_files.prefixes = vec!["tenant1.example.com/".into()];
        GatewayServer::new(assemble(config).unwrap())
    }

    fn get(host: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_virtual_host_root_served_in_process() {
        let response = server()
            .router()
            .oneshot(get("tenant1.example.com", "/tenant1.example.com/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/tenant1.example.com/"
        );
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_stages_run_before_static_files() {
        let server = server();

        let response = server
            .router()
            .oneshot(get("tenant1.example.com", "/private.txt"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::LOCATION).is_none());

        server
            .contexts()
            .save("s1", crate::security::Principal::new("alice"));
        let mut request = get("tenant1.example.com", "/private.txt");
        request
            .headers_mut()
            .insert(header::COOKIE, "SESSION=s1".parse().unwrap());
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/private.txt");
    }
}
