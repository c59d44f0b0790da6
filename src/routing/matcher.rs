//! Request matching logic.
//!
//! # Responsibilities
//! - Match the request path against compiled path patterns
//! - Match the request method
//! - Combine conditions with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Patterns are compiled once into segments; no regex in the hot path
//! - `**` is only meaningful as the final segment

use axum::body::Body;
use axum::http::{Method, Request};

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// A compiled path pattern.
///
/// Literal patterns match exactly. A trailing `/**` matches the prefix itself
/// and anything below it. `*` matches any run of characters inside a single
/// segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<String>,
    any_suffix: bool,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
        let mut segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();

        let any_suffix = segments.last().map(|s| s == "**").unwrap_or(false);
        if any_suffix {
            segments.pop();
        }

        Self {
            segments,
            any_suffix,
        }
    }

    pub fn matches_path(&self, path: &str) -> bool {
        let Some(trimmed) = path.strip_prefix('/') else {
            return false;
        };
        let path_segments: Vec<&str> = trimmed.split('/').collect();

        if self.any_suffix {
            // "/**" compiles to no segments and matches everything.
            if self.segments.is_empty() {
                return true;
            }
            if path_segments.len() < self.segments.len() {
                return false;
            }
        } else if path_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(path_segments.iter())
            .all(|(pattern, segment)| segment_matches(pattern, segment))
    }
}

/// Glob match of one path segment where `*` spans any characters.
fn segment_matches(pattern: &str, segment: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == segment;
    }

    let pattern = pattern.as_bytes();
    let segment = segment.as_bytes();
    let (mut p, mut s) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while s < segment.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some(p);
            p += 1;
            resume = s;
        } else if p < pattern.len() && pattern[p] == segment[s] {
            p += 1;
            s += 1;
        } else if let Some(star_at) = star {
            p = star_at + 1;
            resume += 1;
            s = resume;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}

/// Matches the request path against one pattern.
#[derive(Debug, Clone)]
pub struct PathPatternMatcher {
    pattern: PathPattern,
}

impl PathPatternMatcher {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: PathPattern::new(pattern),
        }
    }
}

impl Matcher for PathPatternMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.pattern.matches_path(req.uri().path())
    }
}

/// Matches the request method regardless of path.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.method() == self.method
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn push(&mut self, matcher: Box<dyn Matcher>) {
        self.matchers.push(matcher);
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().any(|m| m.matches(req))
    }
}
