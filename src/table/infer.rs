//! Deterministic cell type inference.
//!
//! Grammar, applied to the raw cell text without trimming:
//!
//! ```text
//! ""                               -> null
//! true | True | TRUE               -> boolean
//! false | False | FALSE            -> boolean
//! [+-]?[0-9]+       (fits in i64)  -> integer number
//! [+-]?([0-9]+.?[0-9]*|.[0-9]+)([eE][+-]?[0-9]+)?  (finite) -> float number
//! anything else                    -> string
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::CellValue;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid regex"));

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").expect("valid regex")
});

/// Infer a typed cell from raw CSV text.
pub fn infer_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }

    if let Some(b) = parse_bool(raw) {
        return CellValue::Boolean(b);
    }

    if INTEGER.is_match(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return CellValue::Number(n.into());
        }
        // Out of i64 range, fall through to float.
    }

    if FLOAT.is_match(raw) {
        if let Some(n) = raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return CellValue::Number(n);
        }
    }

    CellValue::String(raw.to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
