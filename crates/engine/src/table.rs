use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::addr;
use crate::cell::{Cell, CellStyle, CellValue};
use crate::error::GridError;

/// Row/column sizing target for [`GridTable::set_cell_size`].
#[derive(Debug, Clone, PartialEq)]
pub enum SizeTarget {
    /// Column width, addressed by letter.
    Column(String),
    /// Row height, addressed by 1-based row number.
    Row(usize),
}

/// A mutable in-memory grid: ordered rows of cells, columns addressed by
/// letter and rows by 1-based number.
///
/// Rows are heterogeneous-length. Writing past a row's current length
/// (or past the last row) implicitly extends the grid with empty cells.
/// All operations mutate in place; there is no undo or versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridTable {
    pub name: String,
    pub(crate) rows: Vec<Vec<Cell>>,
    /// Column index -> display width (Excel character units).
    pub(crate) col_widths: HashMap<usize, f64>,
    /// Row index -> display height (points).
    pub(crate) row_heights: HashMap<usize, f64>,
}

impl Default for GridTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GridTable {
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
            col_widths: HashMap::new(),
            row_heights: HashMap::new(),
        }
    }

    /// Number of occupied rows (also the highest 1-based row number).
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// Length of the widest row.
    pub fn max_col(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// Resolve (column letters, 1-based row) to 0-based indices.
    pub(crate) fn resolve(&self, col: &str, row: usize) -> Result<(usize, usize), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        if row == 0 {
            return Err(GridError::InvalidAddress(format!("{}{}", col, row)));
        }
        Ok((row - 1, col_idx))
    }

    /// Value at an address. Addresses beyond the occupied area read as
    /// `Empty`.
    pub fn value(&self, col: &str, row: usize) -> Result<&CellValue, GridError> {
        let (r, c) = self.resolve(col, row)?;
        Ok(self.value_at(r, c))
    }

    /// Set a value, extending the grid as needed.
    pub fn set_value<V: Into<CellValue>>(
        &mut self,
        col: &str,
        row: usize,
        value: V,
    ) -> Result<(), GridError> {
        let (r, c) = self.resolve(col, row)?;
        self.cell_mut(r, c).value = value.into();
        Ok(())
    }

    /// Style at an address (default style for unoccupied cells).
    pub fn style(&self, col: &str, row: usize) -> Result<CellStyle, GridError> {
        let (r, c) = self.resolve(col, row)?;
        Ok(self
            .rows
            .get(r)
            .and_then(|cells| cells.get(c))
            .map(|cell| cell.style.clone())
            .unwrap_or_default())
    }

    /// Mutable style access, extending the grid as needed.
    pub fn style_mut(&mut self, col: &str, row: usize) -> Result<&mut CellStyle, GridError> {
        let (r, c) = self.resolve(col, row)?;
        Ok(&mut self.cell_mut(r, c).style)
    }

    /// 0-based value access used by the I/O layer.
    pub fn value_at(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(|cell| &cell.value)
            .unwrap_or(&CellValue::Empty)
    }

    /// 0-based setter used by the I/O layer.
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: usize, col: usize, value: V) {
        self.cell_mut(row, col).value = value.into();
    }

    pub(crate) fn cell_mut(&mut self, r: usize, c: usize) -> &mut Cell {
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut self.rows[r];
        if row.len() <= c {
            row.resize_with(c + 1, Cell::default);
        }
        &mut row[c]
    }

    /// Append a row of values after the last occupied row.
    pub fn append_row<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        self.rows
            .push(values.into_iter().map(|v| Cell::new(v.into())).collect());
    }

    /// Delete `count` rows starting at 1-based `start_row`; rows below
    /// shift up.
    pub fn delete_rows(&mut self, start_row: usize, count: usize) {
        if start_row == 0 || start_row > self.rows.len() {
            return;
        }
        let start = start_row - 1;
        let end = (start + count).min(self.rows.len());
        self.rows.drain(start..end);
    }

    /// Iterate rows in order. Enumeration is 0-based; add 1 for
    /// addresses.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Copy whole columns from another table, by (source, target) letter
    /// pairs. Copied cells overwrite target values row by row; styles are
    /// not copied.
    pub fn copy_columns_from(
        &mut self,
        other: &GridTable,
        columns: &[(&str, &str)],
    ) -> Result<(), GridError> {
        for (src, dst) in columns {
            let s = addr::letter_to_col(src)?;
            let d = addr::letter_to_col(dst)?;
            for r in 0..other.rows.len() {
                let value = other.rows[r]
                    .get(s)
                    .map(|cell| cell.value.clone())
                    .unwrap_or_default();
                self.cell_mut(r, d).value = value;
            }
        }
        Ok(())
    }

    /// Write header labels into `header_row`, optionally bolding that
    /// whole row.
    pub fn name_headers(
        &mut self,
        headers: &[(&str, &str)],
        header_row: usize,
        bold: bool,
    ) -> Result<(), GridError> {
        for (col, label) in headers {
            self.set_value(col, header_row, *label)?;
        }
        if bold && header_row >= 1 {
            if let Some(row) = self.rows.get_mut(header_row - 1) {
                for cell in row {
                    cell.style.bold = true;
                }
            }
        }
        Ok(())
    }

    /// Set column widths and row heights from (target, size) pairs.
    pub fn set_cell_size(&mut self, pairs: &[(SizeTarget, f64)]) -> Result<(), GridError> {
        for (target, size) in pairs {
            match target {
                SizeTarget::Column(letters) => {
                    let c = addr::letter_to_col(letters)?;
                    self.col_widths.insert(c, *size);
                }
                SizeTarget::Row(row) => {
                    if *row == 0 {
                        return Err(GridError::InvalidAddress(format!("row {row}")));
                    }
                    self.row_heights.insert(row - 1, *size);
                }
            }
        }
        Ok(())
    }

    /// Column widths set via `set_cell_size` (0-based column index).
    pub fn column_widths(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.col_widths.iter().map(|(&c, &w)| (c, w))
    }

    /// Row heights set via `set_cell_size` (0-based row index).
    pub fn row_heights(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row_heights.iter().map(|(&r, &h)| (r, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unoccupied_addresses_read_empty() {
        let table = GridTable::new();
        assert_eq!(table.value("A", 1).unwrap(), &CellValue::Empty);
        assert_eq!(table.value("ZZ", 500).unwrap(), &CellValue::Empty);
    }

    #[test]
    fn set_value_extends_grid() {
        let mut table = GridTable::new();
        table.set_value("C", 3, "hi").unwrap();

        assert_eq!(table.max_row(), 3);
        assert_eq!(table.max_col(), 3);
        assert_eq!(table.value("C", 3).unwrap(), &CellValue::Text("hi".into()));
        assert_eq!(table.value("A", 1).unwrap(), &CellValue::Empty);
    }

    #[test]
    fn rows_are_heterogeneous_length() {
        let mut table = GridTable::new();
        table.append_row(["a"]);
        table.append_row(["b", "c", "d"]);

        assert_eq!(table.max_row(), 2);
        assert_eq!(table.max_col(), 3);
        assert_eq!(table.value("C", 1).unwrap(), &CellValue::Empty);
        assert_eq!(table.value("C", 2).unwrap(), &CellValue::Text("d".into()));
    }

    #[test]
    fn bad_addresses_error() {
        let mut table = GridTable::new();
        assert!(matches!(
            table.value("A1", 1),
            Err(GridError::InvalidAddress(_))
        ));
        assert!(matches!(
            table.value("A", 0),
            Err(GridError::InvalidAddress(_))
        ));
        assert!(matches!(
            table.set_value("", 1, "x"),
            Err(GridError::InvalidAddress(_))
        ));
    }

    #[test]
    fn delete_rows_shifts_up() {
        let mut table = GridTable::new();
        for label in ["one", "two", "three", "four"] {
            table.append_row([label]);
        }

        table.delete_rows(2, 2);

        assert_eq!(table.max_row(), 2);
        assert_eq!(table.value("A", 1).unwrap(), &CellValue::Text("one".into()));
        assert_eq!(
            table.value("A", 2).unwrap(),
            &CellValue::Text("four".into())
        );
    }

    #[test]
    fn copy_columns_between_tables() {
        let mut source = GridTable::with_name("Source");
        source.append_row(["name", "ignored", "amount"]);
        source.append_row(["Alice", "x", "12"]);

        let mut target = GridTable::with_name("Target");
        target
            .copy_columns_from(&source, &[("A", "A"), ("C", "B")])
            .unwrap();

        assert_eq!(
            target.value("A", 2).unwrap(),
            &CellValue::Text("Alice".into())
        );
        assert_eq!(target.value("B", 1).unwrap(), &CellValue::Text("amount".into()));
        assert_eq!(target.value("B", 2).unwrap(), &CellValue::Text("12".into()));
        assert_eq!(target.value("C", 1).unwrap(), &CellValue::Empty);
    }

    #[test]
    fn name_headers_writes_and_bolds() {
        let mut table = GridTable::new();
        table.append_row(["", "", ""]);
        table
            .name_headers(&[("A", "Name"), ("C", "Total")], 1, true)
            .unwrap();

        assert_eq!(table.value("A", 1).unwrap(), &CellValue::Text("Name".into()));
        assert_eq!(
            table.value("C", 1).unwrap(),
            &CellValue::Text("Total".into())
        );
        assert!(table.style("B", 1).unwrap().bold);
    }

    #[test]
    fn cell_sizes_by_tagged_target() {
        let mut table = GridTable::new();
        table
            .set_cell_size(&[
                (SizeTarget::Column("B".into()), 24.0),
                (SizeTarget::Row(2), 18.0),
            ])
            .unwrap();

        let widths: Vec<(usize, f64)> = table.column_widths().collect();
        let heights: Vec<(usize, f64)> = table.row_heights().collect();
        assert_eq!(widths, vec![(1, 24.0)]);
        assert_eq!(heights, vec![(1, 18.0)]);

        assert!(table
            .set_cell_size(&[(SizeTarget::Column("2".into()), 10.0)])
            .is_err());
    }
}
