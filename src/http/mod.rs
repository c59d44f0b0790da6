//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ordered stages)
//!     → request.rs (request ID, trace span)
//!     → middleware/authorization.rs (unsecured pattern, OPTIONS, or principal)
//!     → middleware/host_rewrite.rs (default document rewrite, Location header)
//!     → static resource server (ServeDir)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::GatewayServer;
