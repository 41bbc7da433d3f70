//! Core database trait for diagram data storage
//!
//! This trait defines the interface for storing and managing diagram data.
//! Each diagram type implements this with its own node and edge data types.

use anyhow::Result;

/// Core trait for diagram databases
///
/// This trait represents the data storage layer for diagram information.
/// The emitter writes into it, renderers and exporters read from it.
pub trait Database: Send + Sync {
    /// The node identifier type for this database
    type Id: Copy + Eq + Send + Sync;

    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge to the database
    ///
    /// Both endpoints must already exist.
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by ID
    fn get_node(&self, id: Self::Id) -> Option<&Self::Node>;

    /// Iterate over all nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in insertion order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
