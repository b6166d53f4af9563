//! CSV decoding into a [`TabularDocument`].

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::infer::infer_cell;
use super::types::TabularDocument;
use crate::error::ParseError;

const UTF8_BOM: char = '\u{feff}';

/// Parse comma-separated text into a tabular document.
///
/// The first record is the header. Rows shorter than the header are padded
/// with nulls and longer rows are cut to the header width. A repeated header
/// name gets a `.N` suffix (`a`, `b`, `a.1`) so every column survives.
pub fn parse_csv(body: &[u8]) -> Result<TabularDocument, ParseError> {
    let text = std::str::from_utf8(body).map_err(|e| ParseError::NotText {
        offset: e.valid_up_to(),
    })?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let columns = unique_columns(reader.headers().map_err(malformed)?);
    let width = columns.len();
    let mut doc = TabularDocument::new(columns);

    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(malformed)? {
        doc.push_row(record.iter().take(width).map(infer_cell).collect());
    }

    debug!(
        columns = doc.columns().len(),
        rows = doc.len(),
        "Parsed CSV document"
    );

    Ok(doc)
}

fn malformed(err: csv::Error) -> ParseError {
    ParseError::Malformed {
        record: err.position().map(|p| p.record() + 1).unwrap_or(0),
        reason: err.to_string(),
    }
}

/// Header names with repeats renamed to `name.1`, `name.2`, ...
fn unique_columns(headers: &StringRecord) -> Vec<String> {
    let mut taken: HashSet<String> = headers.iter().map(str::to_string).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(headers.len());
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(headers.len());

    for name in headers {
        if seen.insert(name) {
            columns.push(name.to_string());
            continue;
        }
        let suffix = next_suffix.entry(name).or_insert(1);
        let renamed = loop {
            let candidate = format!("{name}.{suffix}");
            *suffix += 1;
            if taken.insert(candidate.clone()) {
                break candidate;
            }
        };
        columns.push(renamed);
    }

    columns
}
