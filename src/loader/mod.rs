//! Template source resolution.
//! Turns the user's template choice into a [`TemplateTree`], fetching remote
//! sources into a staging directory when needed.
use crate::constants::{ARCHIVE_PREFIX, DEFAULT_ARCHIVE_HOST, DEFAULT_TEMPLATES_DIR};
use crate::error::{Error, Result};
use crate::loader::archive::{is_owner_repo, ArchiveLoader};
use crate::loader::builtin::{BuiltinLoader, BuiltinRegistry};
use crate::loader::git::GitLoader;
use crate::loader::interface::TemplateLoader;
use crate::loader::local::LocalLoader;
use crate::tree::TemplateTree;
use log::debug;
use std::path::{Path, PathBuf};
use url::Url;

pub mod archive;
pub mod builtin;
pub mod git;
pub mod interface;
pub mod local;

/// Represents the source location of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelector {
    /// Template compiled into the binary
    Builtin(String),
    /// Directory under the templates root
    Local(PathBuf),
    /// Git repository URL (HTTPS, SSH or file)
    RemoteGit(String),
    /// ZIP snapshot given as `owner/repo` or a direct URL
    RemoteArchive(String),
}

impl std::fmt::Display for TemplateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSelector::Builtin(name) => write!(f, "builtin template: '{name}'"),
            TemplateSelector::Local(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            TemplateSelector::RemoteGit(repo) => write!(f, "git repository: '{repo}'"),
            TemplateSelector::RemoteArchive(source) => write!(f, "archive: '{source}'"),
        }
    }
}

impl TemplateSelector {
    /// Parses a raw template argument.
    ///
    /// Explicit remote markers win, then a directory of that name under
    /// `templates_root`, then the builtin registry. Unknown names stay
    /// `Builtin` and fail when resolved.
    pub fn parse<P: AsRef<Path>>(raw: &str, templates_root: P) -> Self {
        let raw = raw.trim();
        if let Some(remote) = Self::remote_marker(raw) {
            return remote;
        }

        if templates_root.as_ref().join(raw).is_dir() {
            return Self::Local(PathBuf::from(raw));
        }

        Self::Builtin(raw.to_string())
    }

    /// Parses the answer to the remote template prompt: a URL or `owner/repo`.
    ///
    /// # Errors
    /// * `Error::InvalidRemote` for anything else
    pub fn parse_remote(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some(remote) = Self::remote_marker(raw) {
            return Ok(remote);
        }
        if is_owner_repo(raw) {
            return Ok(Self::RemoteArchive(raw.to_string()));
        }
        Err(Error::InvalidRemote { input: raw.to_string() })
    }

    fn remote_marker(raw: &str) -> Option<Self> {
        if let Some(short) = raw.strip_prefix(ARCHIVE_PREFIX) {
            return Some(Self::RemoteArchive(short.to_string()));
        }

        if let Ok(url) = Url::parse(raw) {
            match url.scheme() {
                "http" | "https" if url.path().ends_with(".zip") => {
                    return Some(Self::RemoteArchive(raw.to_string()))
                }
                "http" | "https" | "ssh" | "git" | "file" => {
                    return Some(Self::RemoteGit(raw.to_string()))
                }
                _ => {}
            }
        }

        if raw.starts_with("git@") || raw.ends_with(".git") {
            return Some(Self::RemoteGit(raw.to_string()));
        }

        None
    }

    /// Returns true when resolving needs a clone or a download.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteGit(_) | Self::RemoteArchive(_))
    }
}

/// Resolves selectors against a templates root, a builtin registry and an archive host.
#[derive(Debug, Clone)]
pub struct Resolver {
    templates_root: PathBuf,
    registry: BuiltinRegistry,
    archive_host: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATES_DIR)
    }
}

impl Resolver {
    pub fn new<P: Into<PathBuf>>(templates_root: P) -> Self {
        Self {
            templates_root: templates_root.into(),
            registry: BuiltinRegistry::default(),
            archive_host: DEFAULT_ARCHIVE_HOST.to_string(),
        }
    }

    pub fn with_registry(mut self, registry: BuiltinRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_archive_host<S: Into<String>>(mut self, host: S) -> Self {
        self.archive_host = host.into();
        self
    }

    /// Parses `raw` against this resolver's templates root.
    pub fn parse(&self, raw: &str) -> TemplateSelector {
        TemplateSelector::parse(raw, &self.templates_root)
    }

    /// Produces the template tree for `selector`.
    ///
    /// # Errors
    /// * `Error::UnknownTemplate` for builtin names missing from the registry
    /// * `Error::TemplateNotFound` for missing local directories
    /// * `Error::CloneFailed`, `Error::DownloadFailed`, `Error::ExtractFailed` for remote sources
    pub fn resolve(&self, selector: TemplateSelector) -> Result<TemplateTree> {
        debug!("Resolving {selector}.");

        let loader: Box<dyn TemplateLoader + '_> = match selector {
            TemplateSelector::Builtin(name) => Box::new(BuiltinLoader::new(&self.registry, name)),
            TemplateSelector::Local(path) => {
                Box::new(LocalLoader::new(self.templates_root.join(path)))
            }
            TemplateSelector::RemoteGit(repo) => Box::new(GitLoader::new(repo)),
            TemplateSelector::RemoteArchive(source) => {
                Box::new(ArchiveLoader::new(source, self.archive_host.clone()))
            }
        };

        loader.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_selector_display() {
        let fs_source = TemplateSelector::Local(PathBuf::from("/path/to/template"));
        assert_eq!(format!("{}", fs_source), "local path: '/path/to/template'");

        let git_source = TemplateSelector::RemoteGit("git@github.com:user/repo".to_string());
        assert_eq!(format!("{}", git_source), "git repository: 'git@github.com:user/repo'");
    }

    #[test]
    fn test_remote_markers() {
        let root = Path::new("/nonexistent");
        assert_eq!(
            TemplateSelector::parse("https://github.com/user/repo.git", root),
            TemplateSelector::RemoteGit("https://github.com/user/repo.git".to_string())
        );
        assert_eq!(
            TemplateSelector::parse("git@github.com:user/repo.git", root),
            TemplateSelector::RemoteGit("git@github.com:user/repo.git".to_string())
        );
        assert_eq!(
            TemplateSelector::parse("gh@user/repo", root),
            TemplateSelector::RemoteArchive("user/repo".to_string())
        );
        assert_eq!(
            TemplateSelector::parse("https://example.com/t.zip", root),
            TemplateSelector::RemoteArchive("https://example.com/t.zip".to_string())
        );
        assert_eq!(
            TemplateSelector::parse("api-pytest", root),
            TemplateSelector::Builtin("api-pytest".to_string())
        );
    }

    #[test]
    fn test_parse_remote() {
        assert_eq!(
            TemplateSelector::parse_remote(" user/repo ").unwrap(),
            TemplateSelector::RemoteArchive("user/repo".to_string())
        );
        assert!(TemplateSelector::parse_remote("https://github.com/user/repo").unwrap().is_remote());
        assert!(matches!(
            TemplateSelector::parse_remote("api-pytest"),
            Err(Error::InvalidRemote { .. })
        ));
    }
}
