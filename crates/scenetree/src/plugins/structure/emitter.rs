//! Graph emission
//!
//! Materializes the title node, one node per record, one edge per
//! reconstructed parent link, and an ellipsis placeholder for every record
//! marked as repeating. Placeholders hang off the record's *parent*: they say
//! "this parent has more children like this one".

use anyhow::Result;
use tracing::{debug, trace};

use super::record::LineRecord;
use super::registry::NodeTypeRegistry;
use super::tree::ParentLink;
use super::StructureDatabase;
use crate::core::{Database, DiagramError, EdgeData, NodeData, NodeId};

/// Emits structure graphs using a registry for colors
pub struct GraphEmitter<'a> {
    registry: &'a NodeTypeRegistry,
}

impl<'a> GraphEmitter<'a> {
    pub fn new(registry: &'a NodeTypeRegistry) -> Self {
        Self { registry }
    }

    /// Build a complete graph for `name`
    ///
    /// `links` must come from reconstructing `records` (one per record, same
    /// order). Every type is resolved before the first node is created, so an
    /// unknown type yields an error and no graph at all.
    pub fn emit(
        &self,
        name: &str,
        records: &[LineRecord],
        links: &[ParentLink],
    ) -> Result<StructureDatabase> {
        if records.len() != links.len() {
            return Err(DiagramError::database_error(format!(
                "{} records but {} parent links",
                records.len(),
                links.len()
            ))
            .into());
        }

        let colors = records
            .iter()
            .map(|record| self.registry.lookup(&record.node_type, record.line))
            .collect::<Result<Vec<_>, _>>()?;

        let mut database = StructureDatabase::new(name);
        database.add_node(NodeData::title(name, self.registry.root_color()))?;

        for ((record, link), color) in records.iter().zip(links).zip(colors) {
            database.add_node(
                NodeData::new(link.child, record.label(), record.node_type.as_str(), color)
                    .with_annotation(record.annotation.clone()),
            )?;
            database.add_edge(EdgeData::new(link.parent, link.child))?;

            if record.repeats {
                let placeholder = NodeData::ellipsis(
                    link.child.ordinal(),
                    record.node_type.as_str(),
                    color,
                );
                let placeholder_id: NodeId = placeholder.id;
                database.add_node(placeholder)?;
                database.add_edge(EdgeData::new(link.parent, placeholder_id))?;
                trace!(parent = %link.parent, placeholder = %placeholder_id, "Attached ellipsis");
            }
        }

        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Graph emitted"
        );
        Ok(database)
    }
}
