//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (unsecured pattern or OPTIONS? permit)
//!     → context.rs (load principal from the session cookie)
//!     → principal attached, or 401 / redirect to login
//!     → host-path rewrite filter
//! ```
//!
//! # Design Decisions
//! - Fail closed: paths not listed as unsecured need a principal
//! - Pre-flight OPTIONS requests are never challenged
//! - Token exchange and session issuance belong to the login flow, not here

pub mod access_control;
pub mod context;

pub use access_control::{Access, AuthorizationRules};
pub use context::{Principal, SecurityContextRepository, SessionContextRepository};
