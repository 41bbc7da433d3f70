//! Terminal tree rendering
//!
//! Draws the diagram as an indented tree, one node per line:
//!
//! ```text
//! scene
//! └── Group
//!     ├── Geode
//!     ├── Geode
//!     └── ...
//! ```

use anyhow::Result;
use tracing::{debug, span, Level};

use super::StructureDatabase;
use crate::core::{display_width, pad_to_width, CharacterSet, NodeData, NodeId, Renderer};

struct Glyphs {
    branch: &'static str,
    last: &'static str,
    pipe: &'static str,
    blank: &'static str,
}

const UNICODE_GLYPHS: Glyphs = Glyphs {
    branch: "├── ",
    last: "└── ",
    pipe: "│   ",
    blank: "    ",
};

const ASCII_GLYPHS: Glyphs = Glyphs {
    branch: "|-- ",
    last: "`-- ",
    pipe: "|   ",
    blank: "    ",
};

/// One rendered row: the drawn branches and the node they lead to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine<'a> {
    pub prefix: String,
    pub node: &'a NodeData,
}

impl TreeLine<'_> {
    /// Prefix plus label, without the color column
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.node.label)
    }
}

/// Renders a structure graph as a box-drawn tree
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    style: CharacterSet,
    show_colors: bool,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: CharacterSet) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Append each node's fill color in an aligned column
    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    pub fn style(&self) -> CharacterSet {
        self.style
    }

    fn glyphs(&self) -> &'static Glyphs {
        match self.style {
            CharacterSet::Ascii => &ASCII_GLYPHS,
            CharacterSet::Unicode => &UNICODE_GLYPHS,
        }
    }

    /// Rows in depth-first order, starting with the title
    pub fn lines<'a>(&self, database: &'a StructureDatabase) -> Vec<TreeLine<'a>> {
        let mut lines = Vec::new();
        let Some(title) = database.title() else {
            return lines;
        };
        lines.push(TreeLine {
            prefix: String::new(),
            node: title,
        });

        let glyphs = self.glyphs();
        // One frame per open level: its children, the next one to draw, and the indent
        let mut stack: Vec<(Vec<&'a NodeData>, usize, String)> =
            vec![(database.children(NodeId::TITLE), 0, String::new())];

        while let Some((children, next, indent)) = stack.last_mut() {
            let Some(&child) = children.get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;
            let is_last = *next == children.len();
            let (branch, continuation) = if is_last {
                (glyphs.last, glyphs.blank)
            } else {
                (glyphs.branch, glyphs.pipe)
            };
            lines.push(TreeLine {
                prefix: format!("{}{}", indent, branch),
                node: child,
            });
            let child_indent = format!("{}{}", indent, continuation);
            stack.push((database.children(child.id), 0, child_indent));
        }
        lines
    }
}

impl Renderer<StructureDatabase> for TreeRenderer {
    type Output = String;

    fn render(&self, database: &StructureDatabase) -> Result<String> {
        let render_span = span!(Level::INFO, "render_tree", diagram = database.name(), style = %self.style);
        let _enter = render_span.enter();

        let lines = self.lines(database);
        let texts: Vec<String> = lines.iter().map(TreeLine::text).collect();

        let output = if self.show_colors {
            let column = texts.iter().map(|t| display_width(t)).max().unwrap_or(0) + 2;
            texts
                .iter()
                .zip(&lines)
                .map(|(text, line)| format!("{}{}", pad_to_width(text, column), line.node.fill_color))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            texts.join("\n")
        };

        debug!(line_count = lines.len(), "Tree rendered");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "tree"
    }

    fn format(&self) -> &'static str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parser;
    use crate::plugins::structure::StructureParser;

    fn database(input: &str) -> StructureDatabase {
        let mut db = StructureDatabase::new("scene");
        StructureParser::default().parse(input, &mut db).unwrap();
        db
    }

    #[test]
    fn test_unicode_tree() {
        let db = database("Group\n Geode\n Geode*\n");
        let output = TreeRenderer::new().render(&db).unwrap();
        assert_eq!(
            output,
            "scene\n└── Group\n    ├── Geode\n    ├── Geode\n    └── ..."
        );
    }

    #[test]
    fn test_ascii_tree_with_nesting() {
        let db = database("Group\n Switch\n  Geode\nLOD: far\n");
        let output = TreeRenderer::with_style(CharacterSet::Ascii)
            .render(&db)
            .unwrap();
        assert_eq!(
            output,
            "scene\n|-- Group\n|   `-- Switch\n|       `-- Geode\n`-- LOD [far]"
        );
    }

    #[test]
    fn test_color_column_is_aligned() {
        let db = database("Group\n Geode\n");
        let output = TreeRenderer::new().with_colors(true).render(&db).unwrap();
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].ends_with("white"));
        assert!(rows[2].ends_with("tan"));
        let columns: Vec<usize> = rows
            .iter()
            .map(|row| display_width(row) - display_width(row.split_whitespace().last().unwrap()))
            .collect();
        assert!(columns.iter().all(|&c| c == columns[0]));
    }

    #[test]
    fn test_lines_carry_nodes() {
        let db = database("Group\n Geode*\n");
        let lines = TreeRenderer::new().lines(&db);
        assert_eq!(lines.len(), 4);
        assert!(lines[3].node.id.is_ellipsis());
        assert_eq!(lines[1].text(), "└── Group");
    }

    #[test]
    fn test_title_only() {
        let db = database("");
        assert_eq!(TreeRenderer::new().render(&db).unwrap(), "scene");
    }

    #[test]
    fn test_wide_dump_renders_every_row() {
        let input = "Group\n".repeat(40_000);
        let db = database(&input);
        let lines = TreeRenderer::new().lines(&db);
        assert_eq!(lines.len(), 40_001);
        assert_eq!(lines[1].text(), "├── Group");
        assert_eq!(lines[40_000].text(), "└── Group");
    }

    #[test]
    fn test_deep_chain_renders_on_small_stack() {
        let input: String = (0..3_000)
            .map(|depth| format!("{}Group\n", " ".repeat(depth)))
            .collect();
        let db = database(&input);

        let handle = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(move || {
                let lines = TreeRenderer::with_style(CharacterSet::Ascii).lines(&db);
                (lines.len(), lines[1].prefix.clone(), lines[3].prefix.clone())
            })
            .unwrap();
        let (count, first, third) = handle.join().unwrap();
        assert_eq!(count, 3_001);
        assert_eq!(first, "`-- ");
        assert_eq!(third, "        `-- ");
    }

    #[test]
    fn test_empty_database_renders_nothing() {
        let db = StructureDatabase::new("scene");
        assert_eq!(TreeRenderer::new().render(&db).unwrap(), "");
    }
}
