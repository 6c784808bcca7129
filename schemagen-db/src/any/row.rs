//! AnyRow to TextRow conversion

use sqlx::any::AnyRow;
use sqlx::{Column, Row};

use crate::traits::TextRow;

/// Decode every cell of a row as text.
///
/// Cells that are not text are read as bytes or integers and rendered;
/// cells that cannot be decoded at all become `None`.
pub fn to_text_row(row: &AnyRow) -> TextRow {
    let columns: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
    let values = (0..columns.len()).map(|idx| decode_cell(row, idx)).collect();
    TextRow::new(columns, values)
}

fn decode_cell(row: &AnyRow, idx: usize) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map(|v| v.to_string());
    }
    None
}

/// Normalize a declared column type the way driver metadata reports it:
/// upper case, with any `(length)` or `(precision, scale)` suffix removed.
///
/// `"varchar(255)"` becomes `"VARCHAR"`, `"decimal(10, 2) unsigned"`
/// becomes `"DECIMAL UNSIGNED"`.
pub fn normalize_type_name(declared: &str) -> String {
    let mut out = String::with_capacity(declared.len());
    let mut depth = 0usize;
    for ch in declared.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
