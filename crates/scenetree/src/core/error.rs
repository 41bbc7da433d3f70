//! Core error types for diagram processing
//!
//! Every failure in the structure pipeline is a [`DiagramError`]. Errors are
//! grouped by [`ErrorKind`] so callers (the batch orchestrator, the CLI) can
//! decide whether to stop or move on to the next input.

use std::fmt;

use thiserror::Error;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unknown node type '{node_type}' at line {line}")]
    UnknownNodeType { node_type: String, line: usize },

    #[error("Reserved node type 'root' used at line {line}")]
    ReservedNodeType { line: usize },

    #[error("Palette error: {message}")]
    PaletteError { message: String },

    #[error("Depth jump at line {line}: depth {depth} is deeper than the deepest allowed depth ({max_depth})")]
    DepthJump {
        line: usize,
        depth: usize,
        max_depth: usize,
    },

    #[error("Invalid indentation character {ch:?} at line {line}: only spaces set the depth")]
    InvalidIndentation { line: usize, ch: char },

    #[error("Diagram '{name}' has not been generated yet")]
    NotGenerated { name: String },

    #[error("Unsupported export extension '{extension}': use dot, gv, png or svg")]
    UnsupportedFormat { extension: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

/// Broad classification of a [`DiagramError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown or reserved node types, bad palettes
    Configuration,
    /// Malformed indentation
    Structural,
    /// API called in the wrong session state
    Misuse,
    /// Input or output files
    Resource,
    /// Rendering backend or graph bookkeeping failures
    Render,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Misuse => write!(f, "misuse"),
            ErrorKind::Resource => write!(f, "resource"),
            ErrorKind::Render => write!(f, "render"),
        }
    }
}

impl DiagramError {
    /// Create a new unknown node type error
    pub fn unknown_node_type(node_type: impl Into<String>, line: usize) -> Self {
        Self::UnknownNodeType {
            node_type: node_type.into(),
            line,
        }
    }

    /// Create a new palette error
    pub fn palette_error(message: String) -> Self {
        Self::PaletteError { message }
    }

    /// Create a new depth jump error
    pub fn depth_jump(line: usize, depth: usize, max_depth: usize) -> Self {
        Self::DepthJump {
            line,
            depth,
            max_depth,
        }
    }

    /// Create a new "not generated" error for the named diagram
    pub fn not_generated(name: impl Into<String>) -> Self {
        Self::NotGenerated { name: name.into() }
    }

    /// Create a new unsupported export extension error
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::RenderError { message }
    }

    /// Create a new database error
    pub fn database_error(message: String) -> Self {
        Self::DatabaseError { message }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiagramError::UnknownNodeType { .. }
            | DiagramError::ReservedNodeType { .. }
            | DiagramError::PaletteError { .. }
            | DiagramError::UnsupportedFormat { .. } => ErrorKind::Configuration,
            DiagramError::DepthJump { .. } | DiagramError::InvalidIndentation { .. } => {
                ErrorKind::Structural
            }
            DiagramError::NotGenerated { .. } => ErrorKind::Misuse,
            DiagramError::IoError { .. } => ErrorKind::Resource,
            DiagramError::RenderError { .. } | DiagramError::DatabaseError { .. } => {
                ErrorKind::Render
            }
        }
    }

    /// Whether this error should abort the diagram that raised it
    ///
    /// Misuse errors leave the session intact and can be ignored by batch callers.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Misuse
    }
}

/// Recover the [`ErrorKind`] from an `anyhow` error produced by the pipeline
pub fn error_kind(error: &anyhow::Error) -> Option<ErrorKind> {
    error.downcast_ref::<DiagramError>().map(DiagramError::kind)
}
