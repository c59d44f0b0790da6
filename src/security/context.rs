//! Security context storage.
//!
//! The login flow that authenticates users lives outside the gateway. It
//! records principals here under a session id; the authorization gate reads
//! them back from the session cookie on every request.

use axum::http::{header, HeaderMap};
use dashmap::DashMap;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authorities: Vec::new(),
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.push(authority.into());
        self
    }
}

/// Loads the principal associated with a request, if any.
pub trait SecurityContextRepository: Send + Sync {
    fn load(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Server-side session store keyed by the session cookie.
#[derive(Debug)]
pub struct SessionContextRepository {
    cookie_name: String,
    sessions: DashMap<String, Principal>,
}

impl SessionContextRepository {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            sessions: DashMap::new(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn save(&self, session_id: impl Into<String>, principal: Principal) {
        let session_id = session_id.into();
        tracing::debug!(principal = %principal.name, "Security context saved");
        self.sessions.insert(session_id, principal);
    }

    pub fn remove(&self, session_id: &str) -> Option<Principal> {
        self.sessions.remove(session_id).map(|(_, principal)| principal)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn session_id<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim_matches('"'))
    }
}

impl SecurityContextRepository for SessionContextRepository {
    fn load(&self, headers: &HeaderMap) -> Option<Principal> {
        let session_id = self.session_id(headers)?;
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }
}
