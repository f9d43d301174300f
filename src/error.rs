//! Error handling for the gecko application.
//! Defines the error taxonomy shared by the resolver, fetchers, renderer and materializer.

use std::io;
use thiserror::Error;

/// Custom error types for gecko operations.
///
/// Every component returns these to its caller; only the binary's
/// [`default_error_handler`] turns them into a message and an exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// Selector named a builtin template that is not in the registry.
    #[error("Unknown template '{name}'.")]
    UnknownTemplate { name: String },

    /// Local template directory is missing or is not a directory.
    #[error("Template directory '{path}' does not exist.")]
    TemplateNotFound { path: String },

    /// Destination already holds content.
    #[error("Destination '{path}' already exists and is not empty.")]
    DestinationExists { path: String },

    /// Cloning a git repository did not complete.
    #[error("Failed to clone '{url}': {source}.")]
    CloneFailed {
        url: String,
        #[source]
        source: git2::Error,
    },

    /// Downloading a template archive failed or returned a non-2xx status.
    #[error("Failed to download '{url}': {reason}.")]
    DownloadFailed { url: String, reason: String },

    /// Archive could not be read or one of its entries could not be written.
    #[error("Failed to extract archive: {reason}.")]
    ExtractFailed { reason: String },

    /// A template file has malformed or unresolvable placeholder syntax.
    #[error("Template syntax error in '{path}': {reason}.")]
    TemplateSyntaxError { path: String, reason: String },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Answer to the remote template prompt is neither a URL nor `owner/repo`.
    #[error("Invalid remote template '{input}', expected a git URL or 'owner/repo'.")]
    InvalidRemote { input: String },

    /// A template path is empty or would escape the destination directory.
    #[error("Unsafe template path '{path}'.")]
    UnsafePath { path: String },

    /// A user supplied variable could not be parsed.
    #[error("Invalid variable: {0}.")]
    InvalidVariable(String),

    /// Interactive prompt failed (closed terminal, interrupted input).
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
