//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every shared component from the validated configuration
//! - Resolve the static location and index bundled resources
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Components are built once and shared by reference; nothing is global

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::resources::{resolve_location, ResourceError, StaticResourceIndex};
use crate::routing::build_unsecured_paths;
use crate::security::{AuthorizationRules, SessionContextRepository};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("static resources unavailable: {0}")]
    Resources(#[from] ResourceError),
}

/// Everything the request pipeline needs, built once.
pub struct Gateway {
    pub config: GatewayConfig,
    /// Directory the static resource server reads from.
    pub static_dir: PathBuf,
    pub rules: Arc<AuthorizationRules>,
    pub resources: Arc<StaticResourceIndex>,
    pub contexts: Arc<SessionContextRepository>,
}

/// Assemble the gateway components from configuration.
pub fn assemble(config: GatewayConfig) -> Result<Gateway, StartupError> {
    let static_dir = resolve_location(&config.static_files.location)?;
    let resource_root = resolve_location(&config.static_files.resource_root)?;
    let resources = StaticResourceIndex::scan(&resource_root)?;

    let unsecured_paths = build_unsecured_paths(
        &config.static_files.paths,
        &config.static_files.prefixes,
    );
    tracing::info!(
        count = unsecured_paths.len(),
        patterns = ?unsecured_paths,
        "Unsecured path patterns built"
    );

    let rules = AuthorizationRules::new(&unsecured_paths);
    let contexts = SessionContextRepository::new(config.security.session_cookie.clone());

    tracing::info!(
        static_dir = %static_dir.display(),
        resources = resources.len(),
        session_cookie = %contexts.cookie_name(),
        "Gateway assembled"
    );

    Ok(Gateway {
        config,
        static_dir,
        rules: Arc::new(rules),
        resources: Arc::new(resources),
        contexts: Arc::new(contexts),
    })
}
