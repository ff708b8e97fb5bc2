//! # GTFOBins Core
//!
//! I/O-free logic for the GTFOBins MCP server: the index data model, the
//! build transform that flattens parsed corpus headers into the two JSON
//! artifacts, the query operations over loaded artifacts, and code-block
//! formatting for display.
//!
//! This crate performs no filesystem access. Reading the corpus, loading
//! artifacts per call, and serving tools live in the `gtfobins-mcp` crate.

pub mod build;
pub mod error;
pub mod format;
pub mod models;
pub mod query;

pub use error::{Operation, QueryError};
pub use models::{BinaryEntry, BinaryIndex, FunctionCatalog, FunctionInfo, TechniqueEntry};
