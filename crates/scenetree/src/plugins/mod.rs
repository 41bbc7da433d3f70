//! Diagram plugins
//!
//! `structure` implements the core traits for scene-graph structure dumps;
//! `orchestrator` batches structure sessions over a directory.

pub mod orchestrator;
pub mod structure;

pub use orchestrator::*;
pub use structure::*;
