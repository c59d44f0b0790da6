//! Virtual-host gateway library.
//!
//! Serves static sites behind an authorization gate and points each virtual
//! host's root path at its default document.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resources;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
