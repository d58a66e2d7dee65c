use std::fmt;

use crate::rewrite::NumberKind;

/// Errors raised by grid operations.
///
/// "Not found" is never an error here: lookups return `Option`. Unknown
/// palette colors are logged and the operation becomes a no-op. Bulk
/// rewrites abort on the first bad cell, leaving earlier rows already
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Column letters (or a row number) that do not form a valid address.
    InvalidAddress(String),
    /// Numeric coercion failure during a bulk rewrite.
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
        kind: NumberKind,
    },
    /// Date formatting hit a cell that does not hold a date/time value.
    NotADate {
        column: String,
        row: usize,
        found: &'static str,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress(addr) => write!(f, "invalid address: '{addr}'"),
            Self::InvalidNumber {
                column,
                row,
                value,
                kind,
            } => {
                write!(f, "column {column}, row {row}: cannot parse '{value}' as {kind}")
            }
            Self::NotADate { column, row, found } => {
                write!(f, "column {column}, row {row}: expected a date/time value, found {found}")
            }
        }
    }
}

impl std::error::Error for GridError {}
