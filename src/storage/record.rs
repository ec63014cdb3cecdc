//! Fixed-width employee records.
//!
//! Every record encodes to exactly [`RECORD_SIZE`] bytes. Fields are
//! space-padded (or truncated) to their width from
//! [`FIELD_WIDTHS`](crate::common::config::FIELD_WIDTHS) and concatenated in
//! declaration order.

use std::collections::HashMap;

use serde::Serialize;

use crate::common::config::{FIELD_WIDTHS, RECORD_SIZE};
use crate::common::{Error, Result};
use crate::index::{AsKey, Key};

/// One employee record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub ssn: String,
    pub department: String,
    pub address: String,
    pub phone: String,
    pub birthdate: String,
    pub sex: String,
    pub job_code: String,
    pub salary: String,
    pub deleted: bool,
    /// 1-based data line this record was loaded from. Not part of the
    /// fixed-width image.
    pub line_number: Option<u32>,
}

impl Record {
    /// Build a record from a CSV row keyed by column name.
    ///
    /// Missing columns read as empty strings.
    pub fn from_row(row: &HashMap<String, String>, line_number: u32) -> Self {
        let field = |name: &str| row.get(name).cloned().unwrap_or_default();
        Self {
            name: field("NAME"),
            ssn: field("SSN"),
            department: field("DEPARTMENTCODE"),
            address: field("ADDRESS"),
            phone: field("PHONE"),
            birthdate: field("BIRTHDATE"),
            sex: field("SEX"),
            job_code: field("JOBCODE"),
            salary: field("SALARY"),
            deleted: false,
            line_number: Some(line_number),
        }
    }

    fn fields(&self) -> [&str; 10] {
        [
            &self.name,
            &self.ssn,
            &self.department,
            &self.address,
            &self.phone,
            &self.birthdate,
            &self.sex,
            &self.job_code,
            &self.salary,
            if self.deleted { "1" } else { "0" },
        ]
    }

    /// Encode to the fixed-width image.
    ///
    /// # Layout
    /// ```text
    /// name(30) ssn(9) dept(9) address(40) phone(9) birthdate(8)
    /// sex(1) job_code(4) salary(4) deleted(1)
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RECORD_SIZE);
        for (value, width) in self.fields().iter().zip(FIELD_WIDTHS) {
            let take = truncate_at_char(value, width);
            out.extend_from_slice(&value.as_bytes()[..take]);
            out.resize(out.len() + (width - take), b' ');
        }
        out
    }

    /// Decode a fixed-width image. Fields are trimmed.
    ///
    /// # Errors
    /// Returns `Error::RecordSize` if `bytes.len() != RECORD_SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECORD_SIZE {
            return Err(Error::RecordSize {
                expected: RECORD_SIZE,
                actual: bytes.len(),
            });
        }

        let mut values = Vec::with_capacity(FIELD_WIDTHS.len());
        let mut offset = 0;
        for width in FIELD_WIDTHS {
            let raw = String::from_utf8_lossy(&bytes[offset..offset + width]);
            values.push(raw.trim().to_string());
            offset += width;
        }

        // Anything but a non-zero number counts as live.
        let deleted = values[9].parse::<u8>().map(|flag| flag != 0).unwrap_or(false);
        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            name: next(),
            ssn: next(),
            department: next(),
            address: next(),
            phone: next(),
            birthdate: next(),
            sex: next(),
            job_code: next(),
            salary: next(),
            deleted,
            line_number: None,
        })
    }

    /// The SSN as an index key.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if the SSN is not numeric.
    pub fn ssn_key(&self) -> Result<Key> {
        self.ssn.as_key()
    }
}

/// Longest prefix of `value` that fits in `width` bytes without splitting a
/// character.
fn truncate_at_char(value: &str, width: usize) -> usize {
    if value.len() <= width {
        return value.len();
    }
    value
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= width)
        .last()
        .unwrap_or(0)
}
