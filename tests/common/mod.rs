//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use vhost_gateway::config::GatewayConfig;
use vhost_gateway::lifecycle::{assemble, Shutdown};
use vhost_gateway::security::SessionContextRepository;
use vhost_gateway::GatewayServer;

/// A gateway serving the fixture tree on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub contexts: Arc<SessionContextRepository>,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/static")
}

/// Fixture configuration: "127.0.0.1" is the virtual host, so requests sent
/// to the listener's own address exercise the rewrite filter.
pub fn fixture_config() -> GatewayConfig {
    let dir = fixture_dir().to_string_lossy().into_owned();
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.static_files.location = dir.clone();
    config.static_files.resource_root = dir;
    config.static_files.paths = vec!["".into(), "index.html".into(), "assets/**".into()];
    config.static_files.prefixes = vec!["127.0.0.1/".into()];
    config.observability.metrics_enabled = false;
    config
}

/// Assemble and start a gateway; it stops when the handle is dropped.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let gateway = assemble(config).expect("fixture gateway assembles");
    let server = GatewayServer::new(gateway);
    let contexts = server.contexts();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway {
        addr,
        contexts,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
