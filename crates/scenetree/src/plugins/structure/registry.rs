//! Node type registry
//!
//! Maps every recognized node type to the fill color used when drawing it.
//! The reserved `root` type colors the title node and may not appear in input.
//!
//! Palettes can be loaded from JSON:
//!
//! ```json
//! {
//!   "root": "white",
//!   "extends_default": true,
//!   "types": { "Billboard": "pink", "Geode": "#d2b48c" }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ROOT_TYPE;
use crate::core::DiagramError;

/// Environment variable naming a palette file
pub const PALETTE_ENV: &str = "SCENETREE_PALETTE";

const DEFAULT_ROOT_COLOR: &str = "white";

const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("LOD", "orange"),
    ("PagedLOD", "yellow"),
    ("Group", "green"),
    ("MatrixTransform", "turquoise"),
    ("Switch", "violet"),
    ("Geode", "tan"),
];

/// Read-only table of node types and their fill colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTypeRegistry {
    root: String,
    types: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    extends_default: bool,
    #[serde(default)]
    types: BTreeMap<String, String>,
}

impl NodeTypeRegistry {
    /// Create an empty registry with the given title color
    pub fn new(root_color: impl Into<String>) -> Self {
        Self {
            root: root_color.into(),
            types: BTreeMap::new(),
        }
    }

    /// Add or replace a type, builder style
    pub fn with_type(mut self, node_type: impl Into<String>, color: impl Into<String>) -> Self {
        self.types.insert(node_type.into(), color.into());
        self
    }

    /// Fill color of the title node
    pub fn root_color(&self) -> &str {
        &self.root
    }

    /// Fill color of a type, if known
    pub fn fill_color(&self, node_type: &str) -> Option<&str> {
        self.types.get(node_type).map(String::as_str)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.types.contains_key(node_type)
    }

    /// Validate a type read from input line `line` and return its color
    pub fn lookup(&self, node_type: &str, line: usize) -> Result<&str, DiagramError> {
        if node_type == ROOT_TYPE {
            return Err(DiagramError::ReservedNodeType { line });
        }
        self.fill_color(node_type)
            .ok_or_else(|| DiagramError::unknown_node_type(node_type, line))
    }

    /// Registered types in name order, without `root`
    pub fn types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a JSON palette
    pub fn from_json_str(json: &str) -> Result<Self, DiagramError> {
        let palette: PaletteFile = serde_json::from_str(json)
            .map_err(|e| DiagramError::palette_error(format!("invalid palette: {}", e)))?;

        let mut registry = if palette.extends_default {
            Self::default()
        } else {
            Self::new(DEFAULT_ROOT_COLOR)
        };
        if let Some(root) = palette.root {
            registry.root = root;
        }

        for (node_type, color) in palette.types {
            if node_type == ROOT_TYPE {
                return Err(DiagramError::palette_error(
                    "'root' is reserved; set the title color with the top-level \"root\" key"
                        .to_string(),
                ));
            }
            if node_type.trim().is_empty() || node_type.contains([':', '*']) {
                return Err(DiagramError::palette_error(format!(
                    "invalid type name '{}'",
                    node_type
                )));
            }
            registry.types.insert(node_type, color);
        }

        if let Some((node_type, _)) = registry.types().find(|(_, color)| color.trim().is_empty()) {
            return Err(DiagramError::palette_error(format!(
                "type '{}' has an empty color",
                node_type
            )));
        }
        if registry.root.trim().is_empty() {
            return Err(DiagramError::palette_error("root color is empty".to_string()));
        }

        debug!(type_count = registry.len(), "Parsed palette");
        Ok(registry)
    }

    /// Load a JSON palette file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            DiagramError::palette_error(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let registry = Self::from_json_str(&json)?;
        info!(path = %path.display(), type_count = registry.len(), "Loaded palette");
        Ok(registry)
    }

    /// Palette from an explicit path, else `SCENETREE_PALETTE`, else the default
    pub fn resolve(path: Option<&Path>) -> Result<Self, DiagramError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => match std::env::var_os(PALETTE_ENV) {
                Some(env_path) => Self::from_json_file(env_path),
                None => Ok(Self::default()),
            },
        }
    }
}

impl Default for NodeTypeRegistry {
    /// The built-in scene graph palette
    fn default() -> Self {
        DEFAULT_PALETTE
            .iter()
            .fold(Self::new(DEFAULT_ROOT_COLOR), |registry, (node_type, color)| {
                registry.with_type(*node_type, *color)
            })
    }
}
