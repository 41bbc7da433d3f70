//! Core type definitions for diagram processing
//!
//! This module contains the fundamental types used throughout scenetree:
//! node identifiers, node kinds, node and edge data, and the character set
//! used by the terminal renderer.

use std::fmt;

/// Character set for terminal tree output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: `|-- `, `` `-- ``
    Ascii,
    /// Unicode box-drawing characters: `├── `, `└── `
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

/// Identifier of a graph node
///
/// Real nodes are numbered in creation order, with `0` reserved for the
/// title. Ellipsis placeholders borrow the number of the record that
/// triggered them and live in their own id space, so they never collide
/// with a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    Real(usize),
    Ellipsis(usize),
}

impl NodeId {
    /// The title node
    pub const TITLE: NodeId = NodeId::Real(0);

    /// Ordinal of the record this id belongs to
    pub fn ordinal(&self) -> usize {
        match self {
            NodeId::Real(n) | NodeId::Ellipsis(n) => *n,
        }
    }

    pub fn is_title(&self) -> bool {
        *self == NodeId::TITLE
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self, NodeId::Ellipsis(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Real(n) => write!(f, "{}", n),
            NodeId::Ellipsis(n) => write!(f, "{}*", n),
        }
    }
}

/// What produced a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The diagram title, created once before any record
    Title,
    /// One input line
    Record,
    /// "More children of this type" placeholder
    Ellipsis,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Title => write!(f, "title"),
            NodeKind::Record => write!(f, "record"),
            NodeKind::Ellipsis => write!(f, "ellipsis"),
        }
    }
}

/// A node in the diagram with all its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Unique identifier for the node
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Registry type the node was created from
    pub node_type: String,
    /// Free-text annotation from the input line, already part of `label`
    pub annotation: Option<String>,
    /// Fill color looked up in the registry
    pub fill_color: String,
    pub kind: NodeKind,
}

impl NodeData {
    /// Create a node for an input record
    pub fn new(
        id: NodeId,
        label: impl Into<String>,
        node_type: impl Into<String>,
        fill_color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            node_type: node_type.into(),
            annotation: None,
            fill_color: fill_color.into(),
            kind: NodeKind::Record,
        }
    }

    /// Attach the source annotation
    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation;
        self
    }

    /// Create the title node
    pub fn title(label: impl Into<String>, fill_color: impl Into<String>) -> Self {
        Self {
            id: NodeId::TITLE,
            label: label.into(),
            node_type: crate::plugins::structure::ROOT_TYPE.to_string(),
            annotation: None,
            fill_color: fill_color.into(),
            kind: NodeKind::Title,
        }
    }

    /// Create an ellipsis placeholder for the record with the given ordinal
    pub fn ellipsis(
        ordinal: usize,
        node_type: impl Into<String>,
        fill_color: impl Into<String>,
    ) -> Self {
        Self {
            id: NodeId::Ellipsis(ordinal),
            label: "...".to_string(),
            node_type: node_type.into(),
            annotation: None,
            fill_color: fill_color.into(),
            kind: NodeKind::Ellipsis,
        }
    }
}

/// An edge connecting a parent to a child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeData {
    /// Parent node ID
    pub from: NodeId,
    /// Child node ID
    pub to: NodeId,
}

impl EdgeData {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}
