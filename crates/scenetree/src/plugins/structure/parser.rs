//! Structure parser implementation
//!
//! Runs the full text → graph pipeline: record extraction, tree
//! reconstruction and graph emission.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, span, Level};

use super::emitter::GraphEmitter;
use super::record::extract_records;
use super::registry::NodeTypeRegistry;
use super::tree::reconstruct;
use super::StructureDatabase;
use crate::core::{Database, Parser};

/// Parser for indented structure dumps
#[derive(Debug, Clone, Default)]
pub struct StructureParser {
    registry: Arc<NodeTypeRegistry>,
}

impl StructureParser {
    pub fn new(registry: Arc<NodeTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }
}

impl Parser<StructureDatabase> for StructureParser {
    /// Parse `input` into `database`, titled with the database's name
    ///
    /// On error the database keeps its previous contents.
    fn parse(&self, input: &str, database: &mut StructureDatabase) -> Result<()> {
        let parse_span = span!(
            Level::INFO,
            "parse_structure",
            diagram = database.name(),
            input_len = input.len()
        );
        let _enter = parse_span.enter();

        let records = extract_records(input.lines())?;
        debug!(record_count = records.len(), "Extracted line records");

        let links = reconstruct(&records)?;

        let emitted = GraphEmitter::new(&self.registry).emit(database.name(), &records, &links)?;
        *database = emitted;

        info!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Structure parsing completed successfully"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "structure"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}
