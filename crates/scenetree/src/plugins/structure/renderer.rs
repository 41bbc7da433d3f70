//! Graphviz DOT rendering
//!
//! Produces an undirected `graph` with filled nodes, ready for `dot`:
//!
//! ```text
//! graph "scene" {
//!   node [style=filled];
//!   "0" [label="scene", fillcolor="white"];
//!   "1" [label="Group", fillcolor="green"];
//!   "0" -- "1";
//! }
//! ```

use std::fmt::Write as _;

use anyhow::Result;
use tracing::{debug, span, Level};

use super::StructureDatabase;
use crate::core::{wrap_label, Database, NodeData, NodeKind, Renderer};

/// Column at which long annotations wrap onto a new label line
pub const DEFAULT_WRAP_WIDTH: usize = 24;

/// Graphviz DOT renderer
#[derive(Debug, Clone)]
pub struct DotRenderer {
    wrap_width: usize,
}

impl DotRenderer {
    pub fn new() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    /// Set the annotation wrap width (0 disables wrapping)
    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    /// Label text as DOT source, with annotations wrapped onto extra lines
    fn label(&self, node: &NodeData) -> String {
        match (node.kind, &node.annotation) {
            (NodeKind::Record, Some(annotation)) => {
                std::iter::once(node.node_type.clone())
                    .chain(wrap_label(&format!("[{}]", annotation), self.wrap_width))
                    .map(|line| escape_dot(&line))
                    .collect::<Vec<_>>()
                    .join("\\n")
            }
            _ => escape_dot(&node.label),
        }
    }
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<StructureDatabase> for DotRenderer {
    type Output = String;

    fn render(&self, database: &StructureDatabase) -> Result<String> {
        let render_span = span!(
            Level::INFO,
            "render_dot",
            diagram = database.name(),
            node_count = database.node_count()
        );
        let _enter = render_span.enter();

        let mut out = String::new();
        writeln!(out, "graph \"{}\" {{", escape_dot(database.name()))?;
        writeln!(out, "  node [style=filled];")?;

        for node in database.nodes() {
            writeln!(
                out,
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];",
                node.id,
                self.label(node),
                escape_dot(&node.fill_color)
            )?;
        }
        for edge in database.edges() {
            writeln!(out, "  \"{}\" -- \"{}\";", edge.from, edge.to)?;
        }
        out.push_str("}\n");

        debug!(output_len = out.len(), "DOT rendered");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "dot"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}

/// Escape a string for a quoted DOT id or label
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parser;
    use crate::plugins::structure::StructureParser;

    fn render(input: &str) -> String {
        let mut db = StructureDatabase::new("scene");
        StructureParser::default().parse(input, &mut db).unwrap();
        DotRenderer::new().render(&db).unwrap()
    }

    #[test]
    fn test_renderer_metadata() {
        let renderer = DotRenderer::new();
        assert_eq!(renderer.name(), "dot");
        assert_eq!(renderer.format(), "dot");
    }

    #[test]
    fn test_render_nodes_and_edges() {
        let dot = render("Group\n Geode*\n");
        assert!(dot.starts_with("graph \"scene\" {\n"));
        assert!(dot.contains("node [style=filled];"));
        assert!(dot.contains("\"0\" [label=\"scene\", fillcolor=\"white\"];"));
        assert!(dot.contains("\"1\" [label=\"Group\", fillcolor=\"green\"];"));
        assert!(dot.contains("\"2*\" [label=\"...\", fillcolor=\"tan\"];"));
        assert!(dot.contains("\"0\" -- \"1\";"));
        assert!(dot.contains("\"1\" -- \"2\";"));
        assert!(dot.contains("\"1\" -- \"2*\";"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_render_annotation_on_second_line() {
        let dot = render("LOD: near\n");
        assert!(dot.contains("label=\"LOD\\n[near]\""));
    }

    #[test]
    fn test_render_wraps_long_annotation() {
        let mut db = StructureDatabase::new("scene");
        StructureParser::default()
            .parse("Geode: one two three four\n", &mut db)
            .unwrap();
        let dot = DotRenderer::new().with_wrap_width(12).render(&db).unwrap();
        assert!(dot.contains("label=\"Geode\\n[one two\\nthree four]\""));
    }

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_dot("a\\b"), "a\\\\b");
        assert_eq!(escape_dot("a\nb"), "a\\nb");
    }

    #[test]
    fn test_render_escapes_annotation_quotes() {
        let dot = render("Switch: \"night\" mode\n");
        assert!(dot.contains("[\\\"night\\\" mode]"));
    }

    #[test]
    fn test_render_empty_diagram() {
        let dot = render("");
        assert!(dot.contains("\"0\" [label=\"scene\""));
        assert!(!dot.contains("--"));
    }
}
