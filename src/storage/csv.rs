//! Minimal CSV reader for employee files.
//!
//! Handles exactly what the employee exports need: one header line, commas
//! inside double quotes that do not split, and quotes stripped from values.
//! No escaped quotes, no multi-line fields.

use std::collections::HashMap;

use log::debug;

use crate::common::{Error, Result};

use super::record::Record;

/// Split one line on commas that are outside double quotes.
///
/// Quotes are removed from the returned fields.
pub(crate) fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parse CSV text into records.
///
/// Rows whose field count differs from the header are skipped. Each record's
/// line number is its 1-based position among the data lines, so skipped
/// rows still consume a number.
///
/// # Errors
/// Returns `Error::EmptyCsv` if there is no header or no data line.
pub(crate) fn parse_records(text: &str) -> Result<Vec<Record>> {
    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 2 {
        return Err(Error::EmptyCsv);
    }

    let headers: Vec<String> = lines[0].split(',').map(|h| h.trim().to_string()).collect();
    let mut records = Vec::with_capacity(lines.len() - 1);

    for (i, line) in lines.iter().enumerate().skip(1) {
        let values = split_fields(line.trim_end_matches('\r'));
        if values.len() != headers.len() {
            debug!(
                "Skipping CSV line {}: {} fields, expected {}",
                i,
                values.len(),
                headers.len()
            );
            continue;
        }
        let row: HashMap<String, String> = headers.iter().cloned().zip(values).collect();
        records.push(Record::from_row(&row, i as u32));
    }

    Ok(records)
}
