//! Structure graph database
//!
//! Stores the emitted nodes and edges of one diagram in insertion order.

use std::collections::HashMap;

use anyhow::Result;
use tracing::trace;

use crate::core::{Database, DiagramError, EdgeData, NodeData, NodeId, NodeKind};

/// Node/edge storage for one structure diagram
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureDatabase {
    /// Diagram name, used as the title label
    name: String,
    /// Nodes in insertion order
    nodes: Vec<NodeData>,
    /// Position of each node in `nodes`
    index: HashMap<NodeId, usize>,
    /// Edges in insertion order
    edges: Vec<EdgeData>,
    /// Positions in `edges` of each node's outgoing edges
    outgoing: HashMap<NodeId, Vec<usize>>,
    /// Positions in `edges` of each node's incoming edges
    incoming: HashMap<NodeId, Vec<usize>>,
}

impl StructureDatabase {
    /// Create a new empty database for the named diagram
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// The title node, once emitted
    pub fn title(&self) -> Option<&NodeData> {
        self.get_node(NodeId::TITLE)
    }

    /// Parent of a node (the source of its single incoming edge)
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.incoming
            .get(&id)
            .and_then(|positions| positions.first())
            .map(|&i| self.edges[i].from)
    }

    /// Children of a node in insertion order, placeholders included
    pub fn children(&self, id: NodeId) -> Vec<&NodeData> {
        self.outgoing
            .get(&id)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|&i| self.get_node(self.edges[i].to))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get in-degree (number of incoming edges) for a node
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.incoming.get(&id).map_or(0, Vec::len)
    }

    /// Get out-degree (number of outgoing edges) for a node
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.outgoing.get(&id).map_or(0, Vec::len)
    }

    /// Nodes of the given kind
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Number of record nodes (title and placeholders excluded)
    pub fn record_count(&self) -> usize {
        self.nodes_of_kind(NodeKind::Record).count()
    }

    /// Number of ellipsis placeholders
    pub fn ellipsis_count(&self) -> usize {
        self.nodes_of_kind(NodeKind::Ellipsis).count()
    }
}

impl Database for StructureDatabase {
    type Id = NodeId;
    type Node = NodeData;
    type Edge = EdgeData;

    fn add_node(&mut self, node: NodeData) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(
                DiagramError::database_error(format!("Node '{}' already exists", node.id)).into(),
            );
        }
        trace!(id = %node.id, label = %node.label, "Added node");
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: EdgeData) -> Result<()> {
        for end in [edge.from, edge.to] {
            if !self.index.contains_key(&end) {
                return Err(
                    DiagramError::database_error(format!("Node '{}' not found", end)).into(),
                );
            }
        }
        if edge.to.is_title() {
            return Err(DiagramError::database_error(
                "The title node cannot have a parent".to_string(),
            )
            .into());
        }
        trace!(from = %edge.from, to = %edge.to, "Added edge");
        let position = self.edges.len();
        self.outgoing.entry(edge.from).or_default().push(position);
        self.incoming.entry(edge.to).or_default().push(position);
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: NodeId) -> Option<&NodeData> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructureDatabase {
        let mut db = StructureDatabase::new("scene");
        db.add_node(NodeData::title("scene", "white")).unwrap();
        db.add_node(NodeData::new(NodeId::Real(1), "Group", "Group", "green"))
            .unwrap();
        db.add_node(NodeData::new(NodeId::Real(2), "Geode", "Geode", "tan"))
            .unwrap();
        db.add_edge(EdgeData::new(NodeId::TITLE, NodeId::Real(1)))
            .unwrap();
        db.add_edge(EdgeData::new(NodeId::Real(1), NodeId::Real(2)))
            .unwrap();
        db
    }

    #[test]
    fn test_counts_and_lookup() {
        let db = sample();
        assert_eq!(db.node_count(), 3);
        assert_eq!(db.edge_count(), 2);
        assert_eq!(db.record_count(), 2);
        assert_eq!(db.get_node(NodeId::Real(2)).unwrap().label, "Geode");
        assert_eq!(db.title().unwrap().label, "scene");
    }

    #[test]
    fn test_navigation() {
        let db = sample();
        assert_eq!(db.parent(NodeId::Real(2)), Some(NodeId::Real(1)));
        assert_eq!(db.parent(NodeId::TITLE), None);
        assert_eq!(db.children(NodeId::TITLE).len(), 1);
        assert_eq!(db.out_degree(NodeId::Real(1)), 1);
        assert_eq!(db.in_degree(NodeId::Real(1)), 1);
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let db = sample();
        let ids: Vec<NodeId> = db.nodes().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId::TITLE, NodeId::Real(1), NodeId::Real(2)]);
    }

    #[test]
    fn test_edge_to_missing_node_rejected() {
        let mut db = sample();
        assert!(db
            .add_edge(EdgeData::new(NodeId::Real(1), NodeId::Real(9)))
            .is_err());
        assert!(db
            .add_edge(EdgeData::new(NodeId::Ellipsis(2), NodeId::Real(2)))
            .is_err());
        assert_eq!(db.edge_count(), 2);
    }

    #[test]
    fn test_edge_into_title_rejected() {
        let mut db = sample();
        assert!(db
            .add_edge(EdgeData::new(NodeId::Real(1), NodeId::TITLE))
            .is_err());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut db = sample();
        let err = db
            .add_node(NodeData::new(NodeId::Real(1), "Group", "Group", "green"))
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_clear() {
        let mut db = sample();
        db.clear();
        assert_eq!(db.node_count(), 0);
        assert_eq!(db.edge_count(), 0);
        assert_eq!(db.name(), "scene");
        assert!(db.children(NodeId::TITLE).is_empty());
        assert_eq!(db.parent(NodeId::Real(2)), None);
    }

    #[test]
    fn test_navigation_on_wide_graph() {
        let mut db = StructureDatabase::new("scene");
        db.add_node(NodeData::title("scene", "white")).unwrap();
        for n in 1..=50_000 {
            db.add_node(NodeData::new(NodeId::Real(n), "Group", "Group", "green"))
                .unwrap();
            db.add_edge(EdgeData::new(NodeId::TITLE, NodeId::Real(n)))
                .unwrap();
        }

        let children = db.children(NodeId::TITLE);
        assert_eq!(children.len(), 50_000);
        assert_eq!(children[0].id, NodeId::Real(1));
        assert_eq!(children[49_999].id, NodeId::Real(50_000));
        assert_eq!(db.out_degree(NodeId::TITLE), 50_000);
        for n in 1..=50_000 {
            assert_eq!(db.parent(NodeId::Real(n)), Some(NodeId::TITLE));
            assert!(db.children(NodeId::Real(n)).is_empty());
        }
    }
}
