//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     static_files.paths × static_files.prefixes
//!     → patterns.rs (expand into unsecured path patterns)
//!     → matcher.rs (compile into matchers for the authorization gate)
//!
//! Per request (Host, path):
//!     → rewrite.rs (canonical root or bundled resource?)
//!     → Return: PassThrough or Matched { path, location }
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at startup, immutable at runtime
//! - No regex in hot path (segment globbing only)
//! - Deterministic: same input always yields the same decision

pub mod matcher;
pub mod patterns;
pub mod rewrite;

pub use patterns::build_unsecured_paths;
pub use rewrite::{decide, RequestDescriptor, RewriteDecision};
