//! User input and interaction handling.
//! Collects the project name and template choice, either from flags or
//! interactively through dialoguer.

use crate::constants::{DEFAULT_PROJECT_NAME, REMOTE_TEMPLATE_CHOICE, TEMPLATE_CHOICES};
use crate::error::{Error, Result};
use crate::loader::{Resolver, TemplateSelector};
use dialoguer::{Input, Select};

/// Source of interactive answers.
pub trait Prompter {
    /// Asks for a line of text, offering `default`.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Asks to pick one of `items`; returns the chosen index.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(|e| Error::PromptError(e.to_string()))
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .default(default)
            .items(items)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}

/// Checks that `name` can be used as a single directory name.
///
/// # Errors
/// * `Error::InvalidVariable` for empty names, `.`/`..` or names with separators
pub fn validate_project_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidVariable(format!("'{name}' is not a valid project name")));
    }
    Ok(name.to_string())
}

/// Returns the project name from the flag, the prompt, or the default.
pub fn ask_project_name(
    prompt: &dyn Prompter,
    name: Option<String>,
    no_input: bool,
) -> Result<String> {
    let name = match name {
        Some(name) => name,
        None if no_input => DEFAULT_PROJECT_NAME.to_string(),
        None => prompt.input("Project name", Some(DEFAULT_PROJECT_NAME))?,
    };
    validate_project_name(&name)
}

/// Returns the template selector from the argument, the menu, or the first builtin.
///
/// Picking the remote entry asks for a git URL or `owner/repo`.
pub fn ask_template(
    prompt: &dyn Prompter,
    resolver: &Resolver,
    template: Option<String>,
    no_input: bool,
) -> Result<TemplateSelector> {
    if let Some(raw) = template {
        return Ok(resolver.parse(&raw));
    }
    if no_input {
        return Ok(resolver.parse(TEMPLATE_CHOICES[0]));
    }

    let index = prompt.select("Select a template", &TEMPLATE_CHOICES, 0)?;
    let choice = *TEMPLATE_CHOICES
        .get(index)
        .ok_or_else(|| Error::PromptError(format!("no template at index {index}")))?;
    if choice == REMOTE_TEMPLATE_CHOICE {
        let remote = prompt.input("Git URL or owner/repo", None)?;
        return TemplateSelector::parse_remote(&remote);
    }
    Ok(resolver.parse(choice))
}
