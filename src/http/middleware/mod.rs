//! Request pipeline stages.

pub mod authorization;
pub mod host_rewrite;
pub mod metrics;

pub use authorization::{authorization_middleware, AuthorizationState};
pub use host_rewrite::{host_rewrite_middleware, HostRewriteState, OriginalPath};
pub use metrics::metrics_middleware;
