//! Tabular data module.
//!
//! This module handles:
//! - Cell, row and document types
//! - Deterministic per-cell type inference
//! - CSV decoding into a tabular document

pub mod infer;
pub mod parser;
pub mod types;

pub use infer::infer_cell;
pub use parser::parse_csv;
pub use types::{CellKind, CellValue, Preview, PreviewSummary, TabularDocument};
