use crate::error::Result;
use crate::tree::TemplateTree;

/// Trait for loading templates from different sources.
pub trait TemplateLoader {
    /// Produces the template tree for this source.
    ///
    /// # Returns
    /// * `Result<TemplateTree>` - Files in memory or a directory to walk
    fn load(&self) -> Result<TemplateTree>;
}
