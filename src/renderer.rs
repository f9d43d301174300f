//! Substitution engine for gecko.
//! Renders template file contents and paths through MiniJinja placeholders
//! such as `{{ ProjectName }}`.
use crate::bindings::VariableBinding;
use crate::error::{Error, Result};
use crate::tree::normalize_relative_path;
use log::debug;
use minijinja::{Environment, UndefinedBehavior};

/// Delimiters that open a MiniJinja expression, statement or comment.
const TEMPLATE_DELIMITERS: [&str; 3] = ["{{", "{%", "{#"];

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders raw file content with the given bindings.
    ///
    /// # Arguments
    /// * `name` - Template relative path, used in error messages
    /// * `content` - Raw file bytes
    /// * `bindings` - Placeholder values
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Rendered bytes; unchanged for binary or placeholder-free content
    fn render(&self, name: &str, content: &[u8], bindings: &VariableBinding) -> Result<Vec<u8>>;

    /// Renders a template relative path, so directories and file names can carry placeholders.
    ///
    /// # Errors
    /// * `Error::UnsafePath` if the rendered path is empty or escapes the destination
    fn render_path(&self, path: &str, bindings: &VariableBinding) -> Result<String> {
        let rendered = self.render(path, path.as_bytes(), bindings)?;
        let rendered = String::from_utf8(rendered)
            .map_err(|_| Error::UnsafePath { path: path.to_string() })?;
        normalize_relative_path(&rendered)
    }
}

/// Returns true when `text` contains anything MiniJinja would interpret.
pub fn has_template_syntax(text: &str) -> bool {
    TEMPLATE_DELIMITERS.iter().any(|delimiter| text.contains(delimiter))
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer that keeps trailing newlines and rejects unknown placeholders.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders content using MiniJinja.
    ///
    /// Undefined names are errors, so a file that only uses `{{ }}` for
    /// another tool (GitHub Actions `${{ secrets.TOKEN }}`, Helm charts) fails
    /// the whole run. Such templates must wrap those parts in
    /// `{% raw %}...{% endraw %}`.
    ///
    /// # Errors
    /// * `Error::TemplateSyntaxError` if the content fails to compile or references
    ///   a placeholder that has no binding
    fn render(&self, name: &str, content: &[u8], bindings: &VariableBinding) -> Result<Vec<u8>> {
        let Ok(text) = std::str::from_utf8(content) else {
            debug!("'{name}' is not valid UTF-8, copying as is.");
            return Ok(content.to_vec());
        };

        if !has_template_syntax(text) {
            return Ok(content.to_vec());
        }

        let syntax_error = |e: minijinja::Error| Error::TemplateSyntaxError {
            path: name.to_string(),
            reason: e.to_string(),
        };

        let rendered = self.env.render_str(text, bindings).map_err(syntax_error)?;
        Ok(rendered.into_bytes())
    }
}
