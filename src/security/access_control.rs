//! Authorization rules.
//! Decides which requests may skip authentication.

use axum::body::Body;
use axum::http::{Method, Request};

use crate::routing::matcher::{AnyMatcher, Matcher, MethodMatcher, PathPatternMatcher};

/// What the gate requires of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Permit,
    Authenticate,
}

/// Ordered permit rules; anything they do not match needs a principal.
#[derive(Debug)]
pub struct AuthorizationRules {
    permit_all: AnyMatcher,
}

impl AuthorizationRules {
    /// Permit the given unsecured patterns and every `OPTIONS` request.
    pub fn new<S: AsRef<str>>(unsecured_paths: &[S]) -> Self {
        let mut permit_all = AnyMatcher::default();
        for pattern in unsecured_paths {
            permit_all.push(Box::new(PathPatternMatcher::new(pattern.as_ref())));
        }
        permit_all.push(Box::new(MethodMatcher::new(Method::OPTIONS)));

        Self { permit_all }
    }

    pub fn evaluate(&self, req: &Request<Body>) -> Access {
        if self.permit_all.matches(req) {
            Access::Permit
        } else {
            Access::Authenticate
        }
    }
}
