//! Tabular document types and data structures.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use strum::Display;

/// A single parsed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty or missing cell.
    Null,
    /// `true` / `false`.
    Boolean(bool),
    /// Integer or finite float.
    Number(serde_json::Number),
    /// Anything else, verbatim.
    String(String),
}

impl CellValue {
    /// Type tag of this cell.
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Null => CellKind::Null,
            CellValue::Boolean(_) => CellKind::Boolean,
            CellValue::Number(_) => CellKind::Number,
            CellValue::String(_) => CellKind::String,
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

/// Cell type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CellKind {
    /// Null cell.
    Null,
    /// Boolean cell.
    Boolean,
    /// Numeric cell.
    Number,
    /// String cell.
    String,
}

/// Header plus data rows parsed from delimited text.
///
/// Every row holds exactly `columns.len()` cells, positionally aligned with
/// `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDocument {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularDocument {
    /// Create an empty document with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with nulls or dropping extra cells so the row
    /// matches the header width.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        cells.resize(self.columns.len(), CellValue::Null);
        self.rows.push(cells);
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Take the first `limit` rows as a preview.
    pub fn head(self, limit: usize) -> Preview {
        let total_rows = self.rows.len();
        let mut rows = self.rows;
        rows.truncate(limit);

        Preview {
            columns: self.columns,
            rows,
            total_rows,
        }
    }
}

/// Row-count-bounded prefix of a tabular document.
///
/// Serializes as a JSON array of row objects keyed by column name, in header
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    total_rows: usize,
}

impl Preview {
    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Preview rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows in the preview.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the preview has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows in the source document.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Whether rows were dropped from the source document.
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }

    /// Serialize to the JSON row array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Borrowed view with document metadata, for diagnostics output.
    pub fn summary(&self) -> PreviewSummary<'_> {
        PreviewSummary {
            columns: &self.columns,
            total_rows: self.total_rows,
            truncated: self.is_truncated(),
            rows: self,
        }
    }
}

struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl Serialize for Preview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for cells in &self.rows {
            seq.serialize_element(&RowRef {
                columns: &self.columns,
                cells,
            })?;
        }
        seq.end()
    }
}

/// Preview with metadata.
#[derive(Debug, Serialize)]
pub struct PreviewSummary<'a> {
    /// Column names in header order.
    pub columns: &'a [String],
    /// Data rows in the source document.
    pub total_rows: usize,
    /// Whether the preview dropped rows.
    pub truncated: bool,
    /// The preview rows.
    pub rows: &'a Preview,
}
