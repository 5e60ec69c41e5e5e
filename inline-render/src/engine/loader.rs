//! Append-only loader chain
//!
//! Every inline render pushes a single-entry [`InlineSource`]; hosts may push
//! file-backed [`DirectorySource`]s. Lookups walk the chain in insertion order
//! and the first source that knows an id wins. Nothing is ever removed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::ErrorKind;
use parking_lot::RwLock;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while reading template source text
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A backing file exists but could not be read
    #[error("failed to read template '{id}' from {}: {source}", .path.display())]
    Read {
        /// Requested template id
        id: String,
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl From<LoaderError> for minijinja::Error {
    fn from(err: LoaderError) -> Self {
        Self::new(ErrorKind::InvalidOperation, "could not load template").with_source(err)
    }
}

/// A provider of template source text
pub trait TemplateSource: fmt::Debug + Send + Sync {
    /// Source text for `id`, or `None` if this provider does not know it
    ///
    /// # Errors
    ///
    /// Returns an error if the provider knows `id` but cannot produce it.
    fn load(&self, id: &str) -> Result<Option<String>, LoaderError>;

    /// Whether this provider resolves `id`
    fn contains(&self, id: &str) -> bool;

    /// Backing file for `id`; `None` for in-memory sources
    fn path(&self, _id: &str) -> Option<PathBuf> {
        None
    }

    /// Every id this provider resolves
    fn ids(&self) -> Vec<String>;
}

/// One in-memory template registered under a logical id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSource {
    id: String,
    source: String,
}

impl InlineSource {
    /// Map `id` to `source`
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

impl TemplateSource for InlineSource {
    fn load(&self, id: &str) -> Result<Option<String>, LoaderError> {
        Ok(self.contains(id).then(|| self.source.clone()))
    }

    fn contains(&self, id: &str) -> bool {
        self.id == id
    }

    fn ids(&self) -> Vec<String> {
        vec![self.id.clone()]
    }
}

/// Templates stored as files below a root directory
///
/// Ids are `/`-separated paths relative to the root. Ids that try to leave
/// the root (`..`) never resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve templates from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in id.split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                segment if segment.contains('\\') => return None,
                segment => path.push(segment),
            }
        }
        path.is_file().then_some(path)
    }
}

impl TemplateSource for DirectorySource {
    fn load(&self, id: &str) -> Result<Option<String>, LoaderError> {
        let Some(path) = self.resolve(id) else {
            return Ok(None);
        };
        match std::fs::read_to_string(&path) {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LoaderError::Read {
                id: id.to_owned(),
                path,
                source,
            }),
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    fn path(&self, id: &str) -> Option<PathBuf> {
        self.resolve(id)
    }

    fn ids(&self) -> Vec<String> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(parts.join("/"))
            })
            .collect()
    }
}

/// Ordered, shared, append-only list of template sources
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct LoaderChain {
    sources: Arc<RwLock<Vec<Arc<dyn TemplateSource>>>>,
}

impl LoaderChain {
    /// Create an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source at the end of the chain
    pub fn push(&self, source: impl TemplateSource + 'static) {
        self.sources.write().push(Arc::new(source));
    }

    /// Number of sources in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Whether the chain has no sources
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }

    /// Source text for `id` from the first source that knows it
    ///
    /// # Errors
    ///
    /// Returns an error if the matching source fails to read the template.
    pub fn load(&self, id: &str) -> Result<Option<String>, LoaderError> {
        for source in self.sources.read().iter() {
            if let Some(text) = source.load(id)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// Whether any source resolves `id`
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sources.read().iter().any(|s| s.contains(id))
    }

    /// Backing file of `id` according to the first source that knows it
    #[must_use]
    pub fn source_path(&self, id: &str) -> Option<PathBuf> {
        self.sources
            .read()
            .iter()
            .find(|s| s.contains(id))
            .and_then(|s| s.path(id))
    }

    /// Every resolvable id, in chain order, including shadowed duplicates
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.sources.read().iter().flat_map(|s| s.ids()).collect()
    }
}
