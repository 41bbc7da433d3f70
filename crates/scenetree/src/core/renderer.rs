//! Core renderer trait for diagram output
//!
//! This trait defines the interface for rendering diagram data
//! into output formats (Graphviz DOT, terminal trees).

use anyhow::Result;

use super::Database;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use scenetree::core::Renderer;
/// use scenetree::plugins::structure::{DotRenderer, StructureDatabase};
///
/// let db = StructureDatabase::new("scene");
/// let dot = DotRenderer::new().render(&db).unwrap();
/// assert!(dot.starts_with("graph"));
/// ```
pub trait Renderer<D: Database>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram database into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
