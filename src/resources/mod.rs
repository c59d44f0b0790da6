//! Static resource subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     static_files.location      → resolve_location → directory served by ServeDir
//!     static_files.resource_root → StaticResourceIndex::scan → Arc<dyn ResourceIndex>
//!
//! Per request:
//!     host-path rewrite filter → ResourceIndex::exists(path)
//! ```

pub mod index;

pub use index::{resolve_location, ResourceError, ResourceIndex, StaticResourceIndex};
