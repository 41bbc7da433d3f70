//! Scene-graph structure diagrams
//!
//! Turns an indentation-delimited dump of a scene graph into a labeled,
//! colored node/edge graph:
//!
//! ```text
//! Group
//!  LOD: near
//!   Geode*
//! ```
//!
//! Each line is one node. Leading spaces give its depth, the text before
//! `:` its type, the text after it a free-form annotation. A trailing `*`
//! marks a node whose parent has more children like it; the graph gets a
//! `...` placeholder next to it. A blank line ends the input.

mod database;
mod emitter;
mod export;
mod parser;
pub mod record;
mod registry;
mod renderer;
mod session;
pub mod tree;
mod tree_renderer;

/// Reserved type of the title node
pub const ROOT_TYPE: &str = "root";

pub use database::StructureDatabase;
pub use emitter::GraphEmitter;
pub use export::{ExportFormat, GraphvizExporter, DOT_PROGRAM_ENV};
pub use parser::StructureParser;
pub use record::{extract_record, extract_records, LineRecord, REPEATS_MARKER};
pub use registry::{NodeTypeRegistry, PALETTE_ENV};
pub use renderer::{escape_dot, DotRenderer, DEFAULT_WRAP_WIDTH};
pub use session::{
    diagram_name, read_structure, DiagramSession, GenerateStatus, INPUT_PREFIX, INPUT_SUFFIX,
};
pub use tree::{reconstruct, ParentLink, TreeReconstructor};
pub use tree_renderer::{TreeLine, TreeRenderer};
