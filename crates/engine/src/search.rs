// Search family - linear scans down a column or across the grid

use crate::addr;
use crate::cell::CellValue;
use crate::error::GridError;
use crate::table::GridTable;

impl GridTable {
    /// First non-empty cell in `col` at or after `start_row` satisfying
    /// `pred`, returned with its 1-based row. Empty cells never match.
    pub fn find_first_by<F>(
        &self,
        col: &str,
        start_row: usize,
        pred: F,
    ) -> Result<Option<(usize, CellValue)>, GridError>
    where
        F: Fn(&CellValue) -> bool,
    {
        let col_idx = addr::letter_to_col(col)?;
        for (idx, row) in self.rows.iter().enumerate() {
            let row_num = idx + 1;
            if row_num < start_row {
                continue;
            }
            if let Some(cell) = row.get(col_idx) {
                if !cell.value.is_empty() && pred(&cell.value) {
                    return Ok(Some((row_num, cell.value.clone())));
                }
            }
        }
        Ok(None)
    }

    /// First cell in `col` whose display string contains `needle`
    /// (case-sensitive).
    pub fn find_first(
        &self,
        col: &str,
        needle: &str,
        start_row: usize,
    ) -> Result<Option<(usize, CellValue)>, GridError> {
        self.find_first_by(col, start_row, |value| {
            value.to_display_string().contains(needle)
        })
    }

    /// Value at `return_col` in the **first** row whose `search_col`
    /// value contains `needle`. `None` means no row matched; a matched
    /// row with an unoccupied return cell is `Some(Empty)`.
    pub fn matching_value(
        &self,
        search_col: &str,
        needle: &str,
        return_col: &str,
        start_row: usize,
    ) -> Result<Option<CellValue>, GridError> {
        let ret_idx = addr::letter_to_col(return_col)?;
        match self.find_first(search_col, needle, start_row)? {
            Some((row, _)) => Ok(Some(
                self.rows[row - 1]
                    .get(ret_idx)
                    .map(|cell| cell.value.clone())
                    .unwrap_or_default(),
            )),
            None => Ok(None),
        }
    }

    /// Overwrite `target_col` in **every** row whose `search_col` value
    /// contains `needle`. The first-vs-every asymmetry with
    /// [`matching_value`](Self::matching_value) is intentional. Returns
    /// the number of rows written.
    pub fn set_matching_value(
        &mut self,
        search_col: &str,
        needle: &str,
        target_col: &str,
        value: impl Into<CellValue>,
        start_row: usize,
    ) -> Result<usize, GridError> {
        let search_idx = addr::letter_to_col(search_col)?;
        let target_idx = addr::letter_to_col(target_col)?;
        let value = value.into();

        let mut hits = 0;
        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let matched = self.rows[r].get(search_idx).map_or(false, |cell| {
                !cell.value.is_empty() && cell.value.to_display_string().contains(needle)
            });
            if matched {
                self.cell_mut(r, target_idx).value = value.clone();
                hits += 1;
            }
        }
        Ok(hits)
    }

    /// Two-dimensional lookup: scan rows left to right, accumulating the
    /// 1-based cell position into a tracked column every time a cell
    /// equals `header`, latching a flag once a cell equals `row_label`,
    /// and returning the first cell whose position lands on the tracked
    /// column after the latch.
    ///
    /// Precondition: `header` appears exactly once in the grid, at or
    /// before `row_label` in scan order. Repeated header hits accumulate
    /// into the tracked position and shift the answer.
    pub fn header_row_lookup(&self, header: &str, row_label: &str) -> Option<String> {
        let mut search_column = 0usize;
        let mut row_found = false;

        for row in &self.rows {
            for (cell_number, cell) in row.iter().enumerate() {
                let display = cell.value.to_display_string();
                if display == header {
                    search_column += cell_number + 1;
                }
                if display == row_label {
                    row_found = true;
                }
                if row_found && cell_number + 1 == search_column {
                    return Some(display);
                }
            }
        }
        None
    }

    /// Delete every row whose `col` cell contains `needle`. The cursor
    /// stays put after a deletion so the row that shifted up gets
    /// re-checked. Returns the number of rows removed.
    pub fn remove_matching_rows(
        &mut self,
        col: &str,
        needle: &str,
        start_row: usize,
    ) -> Result<usize, GridError> {
        let col_idx = addr::letter_to_col(col)?;
        let mut removed = 0;
        let mut r = start_row.max(1) - 1;
        while r < self.rows.len() {
            let matched = self.rows[r].get(col_idx).map_or(false, |cell| {
                !cell.value.is_empty() && cell.value.to_display_string().contains(needle)
            });
            if matched {
                self.rows.remove(r);
                removed += 1;
            } else {
                r += 1;
            }
        }
        Ok(removed)
    }
}
