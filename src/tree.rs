//! Template trees: the in-memory or on-disk set of files a project is generated from.

use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};

/// One file of a template definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    relative_path: String,
    content: Vec<u8>,
}

impl TemplateFile {
    /// Creates a file entry, normalizing `path` to a slash separated relative path.
    ///
    /// # Errors
    /// * `Error::UnsafePath` if the path is empty, absolute or climbs above the root
    pub fn new<S: AsRef<str>, C: Into<Vec<u8>>>(path: S, content: C) -> Result<Self> {
        Ok(Self { relative_path: normalize_relative_path(path.as_ref())?, content: content.into() })
    }

    /// Entry for compiled-in templates whose paths are written in normalized form.
    pub(crate) fn from_static(path: &'static str, content: &'static str) -> Self {
        Self { relative_path: path.to_string(), content: content.as_bytes().to_vec() }
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Normalizes a template relative path.
///
/// Backslashes become slashes, empty and `.` segments are dropped and `..`
/// pops the previous segment. A path that is absolute, ends up empty or
/// tries to climb above its root is rejected.
///
/// # Errors
/// * `Error::UnsafePath` for paths that cannot stay inside the template root
pub fn normalize_relative_path(raw: &str) -> Result<String> {
    let unsafe_path = || Error::UnsafePath { path: raw.to_string() };

    let slashed = raw.replace('\\', "/");
    if slashed.starts_with('/') || Path::new(raw).is_absolute() {
        return Err(unsafe_path());
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in slashed.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or_else(unsafe_path)?;
            }
            s if s.contains(':') => return Err(unsafe_path()),
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(unsafe_path());
    }
    Ok(segments.join("/"))
}

/// A resolved template, ready to be materialized exactly once.
#[derive(Debug)]
pub enum TemplateTree {
    /// Files synthesized from the builtin registry.
    Embedded(Vec<TemplateFile>),
    /// Directory walked lazily by the materializer.
    ///
    /// Remote templates keep their staging directory here so it lives exactly
    /// as long as the tree and is removed when the tree is dropped.
    Directory { root: PathBuf, staging: Option<TempDir> },
}

impl TemplateTree {
    /// Tree backed by an existing directory the caller owns.
    pub fn directory<P: Into<PathBuf>>(root: P) -> Self {
        Self::Directory { root: root.into(), staging: None }
    }

    /// Tree backed by freshly fetched content inside `staging`.
    pub fn staged<P: Into<PathBuf>>(root: P, staging: TempDir) -> Self {
        Self::Directory { root: root.into(), staging: Some(staging) }
    }

    /// Root directory for on-disk trees.
    pub fn root(&self) -> Option<&Path> {
        match self {
            Self::Embedded(_) => None,
            Self::Directory { root, .. } => Some(root),
        }
    }
}

impl fmt::Display for TemplateTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded(files) => write!(f, "builtin template ({} files)", files.len()),
            Self::Directory { root, staging: None } => {
                write!(f, "local directory '{}'", root.display())
            }
            Self::Directory { root, staging: Some(_) } => {
                write!(f, "fetched template staged at '{}'", root.display())
            }
        }
    }
}
