//! Core abstractions for diagram processing
//!
//! This module defines the traits shared by the pipeline stages
//! (parser → database → renderer), the common data types, errors and logging.

mod database;
mod error;
pub mod logging;
mod parser;
mod renderer;
mod text;
mod types;

pub use database::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use text::*;
pub use types::*;
