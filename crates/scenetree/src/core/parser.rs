//! Core parser trait for diagram markup
//!
//! This trait defines the interface for parsing diagram text
//! into structured data that can be stored in a database.

use anyhow::Result;

use super::Database;

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use scenetree::core::{Database, Parser};
/// use scenetree::plugins::structure::{StructureDatabase, StructureParser};
///
/// let parser = StructureParser::default();
/// let mut db = StructureDatabase::new("scene");
/// parser.parse("Group\n Geode\n", &mut db).unwrap();
/// assert_eq!(db.node_count(), 3);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse diagram text into the provided database
    ///
    /// Implementations must leave the database untouched when they fail.
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;
}
