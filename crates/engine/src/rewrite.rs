// Bulk rewrite family - sort, replace, coerce, format
//
// Rewrites abort on the first bad cell and leave earlier rows mutated
// in place. There is no rollback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::addr;
use crate::cell::{Cell, CellValue};
use crate::error::GridError;
use crate::style::CURRENCY_FORMAT;
use crate::table::GridTable;

/// Numeric kind for [`GridTable::number_type_fix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberKind {
    Int,
    Float,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Int => write!(f, "an integer"),
            NumberKind::Float => write!(f, "a float"),
        }
    }
}

impl GridTable {
    /// Sort rows at or after `start_row` by the lowercased display
    /// string of `sort_col`. Stable: equal keys keep their relative
    /// order. Rows before `start_row` (headers) stay in place.
    ///
    /// Run sorts before position-dependent styling passes (banding,
    /// per-row highlights); the sort physically removes and re-appends
    /// the affected rows.
    pub fn sort_rows(&mut self, sort_col: &str, start_row: usize) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(sort_col)?;
        let start = start_row.max(1) - 1;
        if start >= self.rows.len() {
            return Ok(());
        }

        let mut keyed: Vec<(String, Vec<Cell>)> = self
            .rows
            .drain(start..)
            .map(|row| {
                let key = row
                    .get(col_idx)
                    .map(|cell| cell.value.to_display_string().to_lowercase())
                    .unwrap_or_default();
                (key, row)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        self.rows.extend(keyed.into_iter().map(|(_, row)| row));
        Ok(())
    }

    /// Apply substring replacements to every cell in `col` whose
    /// lowercased display string is not in `skip`. Pairs apply in order
    /// and may chain on the same cell; results are written back as text.
    pub fn find_replace(
        &mut self,
        col: &str,
        pairs: &[(&str, &str)],
        skip: &[&str],
        start_row: usize,
    ) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let Some(cell) = self.rows[r].get_mut(col_idx) else {
                continue;
            };
            if cell.value.is_empty() {
                continue;
            }
            let display = cell.value.to_display_string();
            if skip.contains(&display.to_lowercase().as_str()) {
                continue;
            }

            let mut out = display;
            let mut changed = false;
            for (find, replace) in pairs {
                if out.contains(find) {
                    out = out.replace(find, replace);
                    changed = true;
                }
            }
            if changed {
                cell.value = CellValue::from(out);
            }
        }
        Ok(())
    }

    /// For each row, the first candidate in `values` (priority order)
    /// found in the source cell's string is written to `dst_col` and
    /// stripped (first occurrence only) from the source cell.
    pub fn move_values(
        &mut self,
        src_col: &str,
        dst_col: &str,
        values: &[&str],
        start_row: usize,
    ) -> Result<(), GridError> {
        let src_idx = addr::letter_to_col(src_col)?;
        let dst_idx = addr::letter_to_col(dst_col)?;

        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let Some(display) = self.rows[r].get(src_idx).and_then(|cell| {
                if cell.value.is_empty() {
                    None
                } else {
                    Some(cell.value.to_display_string())
                }
            }) else {
                continue;
            };

            for item in values {
                if display.contains(item) {
                    self.cell_mut(r, dst_idx).value = CellValue::from(item.to_string());
                    self.cell_mut(r, src_idx).value =
                        CellValue::from(display.replacen(item, "", 1));
                    break;
                }
            }
        }
        Ok(())
    }

    /// Swap "Last, First" style values in `col` to "First Last",
    /// splitting on the first `separator` and trimming both halves.
    pub fn reverse_text(
        &mut self,
        col: &str,
        start_row: usize,
        separator: &str,
    ) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let Some(cell) = self.rows[r].get_mut(col_idx) else {
                continue;
            };
            if cell.value.is_empty() {
                continue;
            }
            let display = cell.value.to_display_string();
            let Some((last, first)) = display.split_once(separator) else {
                continue;
            };
            cell.value = CellValue::from(format!("{} {}", first.trim(), last.trim()));
        }
        Ok(())
    }

    /// Re-type cells in `col` as numbers by parsing their display
    /// strings. A cell that does not parse aborts the operation with
    /// `InvalidNumber`; earlier rows keep their converted values.
    pub fn number_type_fix(
        &mut self,
        col: &str,
        kind: NumberKind,
        start_row: usize,
    ) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let Some(cell) = self.rows[r].get_mut(col_idx) else {
                continue;
            };
            if cell.value.is_empty() {
                continue;
            }

            let display = cell.value.to_display_string();
            cell.value = match kind {
                NumberKind::Int => match display.trim().parse::<i64>() {
                    Ok(n) => CellValue::Int(n),
                    Err(_) => {
                        return Err(GridError::InvalidNumber {
                            column: col.to_uppercase(),
                            row: r + 1,
                            value: display,
                            kind,
                        })
                    }
                },
                NumberKind::Float => match display.trim().parse::<f64>() {
                    Ok(n) => CellValue::Float(n),
                    Err(_) => {
                        return Err(GridError::InvalidNumber {
                            column: col.to_uppercase(),
                            row: r + 1,
                            value: display,
                            kind,
                        })
                    }
                },
            };
        }
        Ok(())
    }

    /// Rewrite date/time cells in `col` as MM/DD/YYYY text. A non-empty
    /// cell that is not a date aborts the operation with `NotADate`;
    /// there is no implicit string parsing.
    pub fn format_date(&mut self, col: &str, start_row: usize) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let Some(cell) = self.rows[r].get_mut(col_idx) else {
                continue;
            };
            match &cell.value {
                CellValue::Empty => {}
                CellValue::DateTime(dt) => {
                    cell.value = CellValue::Text(dt.format("%m/%d/%Y").to_string());
                }
                other => {
                    return Err(GridError::NotADate {
                        column: col.to_uppercase(),
                        row: r + 1,
                        found: other.type_name(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Apply the currency display format to non-empty cells in range.
    /// The stored value is untouched; only presentation metadata
    /// changes. `stop_row` defaults to the last row.
    pub fn format_currency(
        &mut self,
        col: &str,
        start_row: usize,
        stop_row: Option<usize>,
    ) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        let stop = stop_row.unwrap_or_else(|| self.max_row());
        for r in 0..self.rows.len() {
            let row_num = r + 1;
            if row_num < start_row || row_num > stop {
                continue;
            }
            let Some(cell) = self.rows[r].get_mut(col_idx) else {
                continue;
            };
            if cell.value.is_empty() {
                continue;
            }
            cell.style.number_format = Some(CURRENCY_FORMAT.to_string());
        }
        Ok(())
    }
}
