//! Templates compiled into the binary.
//!
//! Each builtin is an ordered list of generators; a generator produces one
//! [`TemplateFile`] whose content is embedded from `assets/` at build time.

use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use crate::tree::{TemplateFile, TemplateTree};
use log::debug;

/// Produces one file of a builtin template.
pub type Generator = fn() -> TemplateFile;

macro_rules! asset {
    ($template:literal, $path:literal) => {
        TemplateFile::from_static(
            $path,
            include_str!(concat!("../../assets/", $template, "/", $path)),
        )
    };
}

fn api_pytest_init() -> TemplateFile {
    asset!("api-pytest", "core/__init__.py")
}

fn api_pytest_conf() -> TemplateFile {
    asset!("api-pytest", "core/conf.py")
}

fn api_pytest_doc_operation() -> TemplateFile {
    asset!("api-pytest", "core/doc_operation.py")
}

fn api_pytest_get_keyword() -> TemplateFile {
    asset!("api-pytest", "core/get_keyword.py")
}

fn api_pytest_logger() -> TemplateFile {
    asset!("api-pytest", "core/logger.py")
}

fn pytest_request_conf() -> TemplateFile {
    asset!("pytest-request", "core/conf.py")
}

fn pytest_request_doc_operation() -> TemplateFile {
    asset!("pytest-request", "core/doc_operation.py")
}

fn pytest_request_get_keyword() -> TemplateFile {
    asset!("pytest-request", "core/get_keyword.py")
}

fn pytest_request_logger() -> TemplateFile {
    asset!("pytest-request", "core/logger.py")
}

const API_PYTEST: &[Generator] = &[
    api_pytest_init,
    api_pytest_conf,
    api_pytest_doc_operation,
    api_pytest_get_keyword,
    api_pytest_logger,
];

const PYTEST_REQUEST: &[Generator] = &[
    pytest_request_conf,
    pytest_request_doc_operation,
    pytest_request_get_keyword,
    pytest_request_logger,
];

static BUILTINS: &[(&str, &[Generator])] =
    &[("api-pytest", API_PYTEST), ("pytest-request", PYTEST_REQUEST)];

/// Read-only catalog of named builtin templates.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinRegistry {
    entries: &'static [(&'static str, &'static [Generator])],
}

impl BuiltinRegistry {
    /// Registry over a custom table.
    pub const fn new(entries: &'static [(&'static str, &'static [Generator])]) -> Self {
        Self { entries }
    }

    /// Generators of the template called `name`, in declaration order.
    pub fn get(&self, name: &str) -> Option<&'static [Generator]> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, generators)| *generators)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new(BUILTINS)
    }
}

/// Loader for templates from the builtin registry.
pub struct BuiltinLoader<'a, S: AsRef<str>> {
    registry: &'a BuiltinRegistry,
    name: S,
}

impl<'a, S: AsRef<str>> BuiltinLoader<'a, S> {
    pub fn new(registry: &'a BuiltinRegistry, name: S) -> Self {
        Self { registry, name }
    }
}

impl<S: AsRef<str>> TemplateLoader for BuiltinLoader<'_, S> {
    /// Runs every generator of the named template.
    ///
    /// # Errors
    /// * `Error::UnknownTemplate` if the registry has no such template
    fn load(&self) -> Result<TemplateTree> {
        let name = self.name.as_ref();
        let generators = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownTemplate { name: name.to_string() })?;

        debug!("Generating builtin template '{name}' ({} files).", generators.len());
        Ok(TemplateTree::Embedded(generators.iter().map(|generate| generate()).collect()))
    }
}
