use crate::constants::VCS_DIR;
use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use crate::tree::TemplateTree;
use log::debug;
use std::fs;
use std::path::Path;
use url::Url;

/// Loader for templates from git repositories.
pub struct GitLoader<S: AsRef<str>> {
    repo: S,
}

impl<S: AsRef<str>> GitLoader<S> {
    /// Creates a new GitLoader instance.
    pub fn new(repo: S) -> Self {
        Self { repo }
    }
}

impl<S: AsRef<str>> TemplateLoader for GitLoader<S> {
    /// Clones the repository into a fresh staging directory.
    ///
    /// # Errors
    /// * `Error::CloneFailed` if the clone does not complete
    fn load(&self) -> Result<TemplateTree> {
        let repo_url = self.repo.as_ref();
        let staging = tempfile::Builder::new().prefix("gecko-").tempdir()?;
        let clone_path = staging.path().join(repo_name(repo_url));

        fetch_git(repo_url, &clone_path)?;
        Ok(TemplateTree::staged(clone_path, staging))
    }
}

/// Directory name a repository URL clones into by default.
///
/// `https://github.com/user/repo.git` and `git@github.com:user/repo.git` both
/// give `repo`; URLs without a usable last segment give `template`.
pub fn repo_name(repo_url: &str) -> &str {
    repo_url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .map(|segment| segment.trim_end_matches(".git"))
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or("template")
}

/// Returns true when `repo_url` goes through a network transport.
///
/// libgit2's local transport cannot do shallow fetches, so `file://` URLs and
/// plain paths are cloned in full.
pub fn is_network_transport(repo_url: &str) -> bool {
    if repo_url.starts_with("git@") {
        return true;
    }
    Url::parse(repo_url)
        .map(|url| matches!(url.scheme(), "http" | "https" | "ssh" | "git"))
        .unwrap_or(false)
}

/// Clones `repo_url` into `dest_dir` and removes the `.git` directory.
///
/// Network clones fetch only the latest commit.
///
/// # Errors
/// * `Error::DestinationExists` if `dest_dir` already exists
/// * `Error::CloneFailed` wrapping the libgit2 error if the clone fails
/// * `Error::IoError` if the VCS metadata cannot be removed
pub fn fetch_git<P: AsRef<Path>>(repo_url: &str, dest_dir: P) -> Result<()> {
    let dest_dir = dest_dir.as_ref();
    if dest_dir.exists() {
        return Err(Error::DestinationExists { path: dest_dir.display().to_string() });
    }

    debug!("Cloning repository '{}' to '{}'.", repo_url, dest_dir.display());

    // Set up authentication callbacks
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if !allowed_types.contains(git2::CredentialType::SSH_KEY) {
            return git2::Cred::default();
        }
        let home = std::env::var("HOME")
            .map_err(|_| git2::Error::from_str("HOME is not set, cannot locate SSH key"))?;
        git2::Cred::ssh_key(
            username_from_url.unwrap_or("git"),
            None,
            &Path::new(&home).join(".ssh").join("id_rsa"),
            None,
        )
    });

    let mut fetch_opts = git2::FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);
    if is_network_transport(repo_url) {
        fetch_opts.depth(1);
    }

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);

    let repo = builder
        .clone(repo_url, dest_dir)
        .map_err(|source| Error::CloneFailed { url: repo_url.to_string(), source })?;
    drop(repo);

    strip_vcs_metadata(dest_dir)
}

/// Removes version control metadata so the result is a plain project tree.
pub fn strip_vcs_metadata<P: AsRef<Path>>(dir: P) -> Result<()> {
    let vcs_dir = dir.as_ref().join(VCS_DIR);
    if vcs_dir.exists() {
        debug!("Removing '{}'.", vcs_dir.display());
        fs::remove_dir_all(&vcs_dir).map_err(Error::IoError)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("https://github.com/user/repo.git"), "repo");
        assert_eq!(repo_name("git@github.com:user/repo.git"), "repo");
        assert_eq!(repo_name("https://github.com/user/repo/"), "repo");
        assert_eq!(repo_name("https://github.com/"), "github.com");
        assert_eq!(repo_name(".git"), "template");
    }

    #[test]
    fn test_is_network_transport() {
        assert!(is_network_transport("https://github.com/user/repo.git"));
        assert!(is_network_transport("ssh://git@github.com/user/repo.git"));
        assert!(is_network_transport("git://example.com/repo.git"));
        assert!(is_network_transport("git@github.com:user/repo.git"));
        assert!(!is_network_transport("file:///srv/templates/repo.git"));
        assert!(!is_network_transport("../templates/repo.git"));
    }
}
