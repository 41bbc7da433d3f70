//! Scenetree - Turn scene-graph structure dumps into diagrams
//!
//! A library for parsing indentation-delimited scene-graph dumps into a
//! labeled, colored node/edge graph, and rendering that graph as Graphviz
//! DOT, PNG/SVG (through Graphviz), or a terminal tree.
//!
//! # Quick Start
//!
//! ```rust
//! use scenetree::render_tree;
//!
//! let tree = render_tree("scene", "Group\n Geode\n Geode*\n").unwrap();
//! assert!(tree.contains("└── ..."));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use a [`DiagramSession`](plugins::structure::DiagramSession):
//!
//! ```rust
//! use std::sync::Arc;
//! use scenetree::prelude::*;
//!
//! let registry = Arc::new(NodeTypeRegistry::default());
//! let mut session = DiagramSession::new("scene", "Group\n LOD: near\n", registry);
//!
//! assert_eq!(session.generate().unwrap(), GenerateStatus::Generated);
//! assert_eq!(session.generate().unwrap(), GenerateStatus::AlreadyGenerated);
//!
//! let graph = session.graph().unwrap();
//! assert_eq!(graph.node_count(), 3);
//!
//! let dot = session.render(&DotRenderer::new()).unwrap();
//! assert!(dot.contains("\"1\" -- \"2\";"));
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CharacterSet, Database, DiagramError, EdgeData, ErrorKind, NodeData, NodeId, NodeKind,
        Parser, Renderer,
    };
    pub use crate::plugins::orchestrator::{BatchReport, Orchestrator};
    pub use crate::plugins::structure::{
        DiagramSession, DotRenderer, ExportFormat, GenerateStatus, GraphvizExporter,
        NodeTypeRegistry, StructureDatabase, StructureParser, TreeRenderer,
    };
}

/// Parse a structure dump into a graph using the default palette
///
/// # Example
/// ```rust
/// use scenetree::parse;
/// use scenetree::prelude::Database;
///
/// let db = parse("scene", "Group\nGroup\n").unwrap();
/// assert_eq!(db.node_count(), 3);
/// assert_eq!(db.edge_count(), 2);
/// ```
pub fn parse(name: &str, input: &str) -> anyhow::Result<plugins::structure::StructureDatabase> {
    use crate::core::Parser as _;
    use crate::plugins::structure::{StructureDatabase, StructureParser};

    let parser = StructureParser::default();
    let mut database = StructureDatabase::new(name);
    parser.parse(input, &mut database)?;
    Ok(database)
}

/// Render a structure dump as Graphviz DOT source
///
/// # Example
/// ```rust
/// let dot = scenetree::render_dot("scene", "Group\n").unwrap();
/// assert!(dot.starts_with("graph \"scene\" {"));
/// ```
pub fn render_dot(name: &str, input: &str) -> anyhow::Result<String> {
    use crate::core::Renderer as _;
    use crate::plugins::structure::DotRenderer;

    DotRenderer::new().render(&parse(name, input)?)
}

/// Render a structure dump as a Unicode terminal tree
pub fn render_tree(name: &str, input: &str) -> anyhow::Result<String> {
    render_tree_with_style(name, input, CharacterSet::default())
}

/// Render a structure dump as a terminal tree with a specific character set
///
/// # Example
/// ```rust
/// use scenetree::{render_tree_with_style, CharacterSet};
///
/// let tree = render_tree_with_style("scene", "Group\n", CharacterSet::Ascii).unwrap();
/// assert_eq!(tree, "scene\n`-- Group");
/// ```
pub fn render_tree_with_style(
    name: &str,
    input: &str,
    style: CharacterSet,
) -> anyhow::Result<String> {
    use crate::core::Renderer as _;
    use crate::plugins::structure::TreeRenderer;

    TreeRenderer::with_style(style).render(&parse(name, input)?)
}
