//! Bundled static resource lookup.
//!
//! # Responsibilities
//! - Answer "does a bundled resource exist at this request path?"
//! - Snapshot the resource tree once at startup
//!
//! # Design Decisions
//! - Lookups are in-memory so the request path never touches the disk
//! - Directories count as resources, the root included
//! - Empty segments are ignored, so `/` is the root and `/docs/` is `docs`

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while locating or indexing static resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The configured location is not a usable file URL.
    #[error("malformed static resource location '{location}': {reason}")]
    MalformedLocation { location: String, reason: String },

    /// The configured location does not name a directory.
    #[error("static resource location {0:?} is not a directory")]
    NotADirectory(PathBuf),

    /// Reading the resource tree failed.
    #[error("failed to read static resources under {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The existence check itself failed.
    #[error("resource lookup failed: {0}")]
    Lookup(String),
}

/// Existence check consulted by the rewrite filter.
///
/// Implementations must not block: the check runs on the request path.
pub trait ResourceIndex: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool, ResourceError>;
}

/// In-memory snapshot of a resource directory.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceIndex {
    entries: HashSet<String>,
}

impl StaticResourceIndex {
    /// Walk `root` and record every file and directory below it.
    pub fn scan(root: &Path) -> Result<Self, ResourceError> {
        if !root.is_dir() {
            return Err(ResourceError::NotADirectory(root.to_path_buf()));
        }

        let mut entries = HashSet::new();
        entries.insert(String::new());
        collect(root, "", &mut entries)?;

        tracing::info!(
            root = %root.display(),
            entries = entries.len(),
            "Static resource index built"
        );

        Ok(Self { entries })
    }

    /// Build an index from relative paths, adding their parent directories.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = HashSet::new();
        entries.insert(String::new());

        for path in paths {
            let Some(key) = lookup_key(path.as_ref()) else {
                continue;
            };
            let mut parent = key.as_str();
            while let Some((dir, _)) = parent.rsplit_once('/') {
                entries.insert(dir.to_string());
                parent = dir;
            }
            entries.insert(key);
        }

        Self { entries }
    }

    /// Number of indexed entries, the root included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        lookup_key(path)
            .map(|key| self.entries.contains(&key))
            .unwrap_or(false)
    }
}

impl ResourceIndex for StaticResourceIndex {
    fn exists(&self, path: &str) -> Result<bool, ResourceError> {
        Ok(self.contains(path))
    }
}

fn collect(dir: &Path, prefix: &str, entries: &mut HashSet<String>) -> Result<(), ResourceError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ResourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in read_dir {
        let entry = entry.map_err(|source| ResourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| ResourceError::Io {
            path: entry.path(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let path = entry.path();
        if file_type.is_dir() {
            collect(&path, &key, entries)?;
        } else if file_type.is_symlink() && path.is_dir() {
            // Linked directories are indexed but never walked, so link cycles terminate.
            tracing::warn!(path = %path.display(), "Not descending into symlinked directory");
        }
        entries.insert(key);
    }

    Ok(())
}

/// Normalise a request path into an index key.
///
/// Returns `None` for paths that try to leave the resource root.
fn lookup_key(path: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" => continue,
            "." | ".." => return None,
            s => segments.push(s),
        }
    }
    Some(segments.join("/"))
}

/// Resolve the configured static location into a directory.
///
/// Accepts a plain path or a `file:` URL. Anything else is fatal.
pub fn resolve_location(location: &str) -> Result<PathBuf, ResourceError> {
    let path = if location.starts_with("file:") {
        let url = url::Url::parse(location).map_err(|e| ResourceError::MalformedLocation {
            location: location.to_string(),
            reason: e.to_string(),
        })?;
        url.to_file_path()
            .map_err(|_| ResourceError::MalformedLocation {
                location: location.to_string(),
                reason: "URL does not name a local file".to_string(),
            })?
    } else if location.contains("://") {
        return Err(ResourceError::MalformedLocation {
            location: location.to_string(),
            reason: "only file: URLs are supported".to_string(),
        });
    } else {
        PathBuf::from(location)
    };

    if !path.is_dir() {
        return Err(ResourceError::NotADirectory(path));
    }

    Ok(path)
}
