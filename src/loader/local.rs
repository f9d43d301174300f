use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use crate::tree::TemplateTree;
use log::debug;
use std::path::Path;

/// Loader for templates from the local filesystem.
pub struct LocalLoader<P: AsRef<Path>> {
    path: P,
}

impl<P: AsRef<Path>> LocalLoader<P> {
    /// Creates a new LocalLoader instance.
    pub fn new(path: P) -> Self {
        Self { path }
    }
}

impl<P: AsRef<Path>> TemplateLoader for LocalLoader<P> {
    /// Returns a deferred tree rooted at the template directory.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if the path is missing or not a directory
    fn load(&self) -> Result<TemplateTree> {
        let path = self.path.as_ref();
        if !path.is_dir() {
            return Err(Error::TemplateNotFound { path: path.display().to_string() });
        }

        debug!("Using local template directory '{}'.", path.display());
        Ok(TemplateTree::directory(path))
    }
}
