//! Tab-separated parsing with per-cell type coercion.

use common::record::{FieldValue, Record, Scalar};

#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub records: Vec<Record>,
    /// Rows shorter than the header. Missing cells are absent fields, not
    /// an error.
    pub short_rows: u64,
}

/// Coerce one raw cell. `None` means the field is absent. Order matters:
/// empty, then boolean, then number, then trimmed text.
pub fn coerce_cell(raw: &str) -> Option<Scalar> {
    let trimmed = raw.trim_end_matches('\r').trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(Scalar::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(Scalar::Bool(false));
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return Some(Scalar::Number(n));
    }
    Some(Scalar::Text(trimmed.to_string()))
}

/// Parse one table. The first line is the header and defines field order;
/// every following line is zipped against it. CRLF and LF both work. There
/// is no quoting or escaping, so a literal tab or newline inside a cell is
/// unrepresentable. Cells beyond the header are dropped.
///
/// The `key_field` column is never number-coerced: keys stay text so the
/// join cannot drift when one source formats a number differently.
pub fn parse_table(text: &str, key_field: &str) -> ParsedTable {
    let mut lines = text.lines();
    let headers: Vec<String> = match lines.next() {
        Some(line) => line
            .split('\t')
            .map(|h| h.trim_end_matches('\r').trim().to_string())
            .collect(),
        None => return ParsedTable::default(),
    };

    let mut table = ParsedTable::default();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() < headers.len() {
            table.short_rows += 1;
        }
        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(cells.iter()) {
            let raw = cell.trim_end_matches('\r').trim();
            if raw.is_empty() {
                continue;
            }
            let value = if header == key_field {
                Scalar::Text(raw.to_string())
            } else {
                match coerce_cell(raw) {
                    Some(v) => v,
                    None => continue,
                }
            };
            record.set(header.clone(), FieldValue::Single(value));
        }
        table.records.push(record);
    }
    table
}
