//! gecko is a project scaffolder for test automation projects.
//! It resolves a template from the builtin registry, a local directory or a
//! remote git/ZIP source and materializes it with placeholder substitution.

/// Placeholder values passed to templates
pub mod bindings;

/// Command-line interface module for the gecko application
pub mod cli;

/// Common constants
pub mod constants;

/// Error types and handling for the gecko application
pub mod error;

/// Template source resolution: builtin, local, git and archive loaders
pub mod loader;

/// Logger setup for the binary
pub mod logger;

/// Tree materialization into the output directory
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Placeholder substitution for file contents and paths
pub mod renderer;

/// Template files and trees
pub mod tree;
