// Validate & style family - fills, bolding, borders, fonts
//
// Color lookups go through an injectable palette. An unknown color name
// logs a warning and turns the operation into a no-op; it never raises.

use std::collections::HashMap;

use crate::addr;
use crate::cell::Fill;
use crate::error::GridError;
use crate::table::GridTable;

/// Excel number format applied by `format_currency`.
pub const CURRENCY_FORMAT: &str = "$#,###.00";

/// Named fill palette. Injected into the highlight operations so
/// callers (and tests) can substitute their own color set.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: HashMap<String, Fill>,
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    /// Register a fill under a name. Names are stored lowercased.
    pub fn insert(&mut self, name: &str, fill: Fill) {
        self.colors.insert(name.to_lowercase(), fill);
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<Fill> {
        self.colors.get(&name.to_lowercase()).copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.insert("red", Fill::rgb(0xFF0000));
        palette.insert("green", Fill::rgb(0x00B050));
        palette.insert("orange", Fill::rgb(0xFFC000));
        palette.insert("yellow", Fill::rgb(0xFFFF00));
        palette.insert("gray", Fill::rgb(0xC0C0C0));
        palette
    }
}

impl GridTable {
    /// Fill every non-skipped cell in `col` whose display string length
    /// (in characters) differs from `length`.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_length(
        &mut self,
        col: &str,
        length: usize,
        color: &str,
        skip: &[&str],
        start_row: usize,
        stop_row: Option<usize>,
        palette: &Palette,
    ) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        let Some(fill) = palette.get(color) else {
            log::warn!("color '{}' not in palette; verify_length skipped", color);
            return Ok(());
        };

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
            let display = cell.value.to_display_string();
            if skip.contains(&display.to_lowercase().as_str()) {
                continue;
            }
            if display.chars().count() != length {
                cell.style.fill = Some(fill);
            }
        }
        Ok(())
    }

    /// Case-insensitive search down `col`; every cell of each matching
    /// row gets the fill.
    pub fn highlight_matching_rows(
        &mut self,
        col: &str,
        needle: &str,
        color: &str,
        start_row: usize,
        palette: &Palette,
    ) -> Result<(), GridError> {
        let col_idx = addr::letter_to_col(col)?;
        let Some(fill) = palette.get(color) else {
            log::warn!("color '{}' not in palette; highlight skipped", color);
            return Ok(());
        };

        let needle = needle.to_lowercase();
        for r in 0..self.rows.len() {
            if r + 1 < start_row {
                continue;
            }
            let matched = self.rows[r].get(col_idx).map_or(false, |cell| {
                !cell.value.is_empty()
                    && cell.value.to_display_string().to_lowercase().contains(&needle)
            });
            if matched {
                for cell in &mut self.rows[r] {
                    cell.style.fill = Some(fill);
                }
            }
        }
        Ok(())
    }

    /// Solid or alternating row fills from `start_row` to just before
    /// `stop_row` (all remaining rows when `stop_row` is `None`).
    pub fn highlight_rows(
        &mut self,
        start_row: usize,
        stop_row: Option<usize>,
        color: &str,
        alternate: bool,
        palette: &Palette,
    ) {
        let Some(fill) = palette.get(color) else {
            log::warn!("color '{}' not in palette; highlight skipped", color);
            return;
        };

        let mut highlight_row = start_row.max(1);
        for r in 0..self.rows.len() {
            let row_num = r + 1;
            if row_num < start_row {
                continue;
            }
            if stop_row == Some(row_num) {
                break;
            }
            if row_num == highlight_row {
                for cell in &mut self.rows[r] {
                    cell.style.fill = Some(fill);
                }
                highlight_row += if alternate { 2 } else { 1 };
            }
        }
    }

    /// Bold every cell from `start_row` to just before `stop_row` (all
    /// remaining rows when `stop_row` is `None`).
    pub fn set_bold_rows(&mut self, start_row: usize, stop_row: Option<usize>) {
        for r in 0..self.rows.len() {
            let row_num = r + 1;
            if row_num < start_row {
                continue;
            }
            if stop_row == Some(row_num) {
                break;
            }
            for cell in &mut self.rows[r] {
                cell.style.bold = true;
            }
        }
    }

    /// Set every cell to the given font, overriding prior font settings.
    pub fn set_table_font(&mut self, name: &str, size: f64) {
        for row in &mut self.rows {
            for cell in row {
                cell.style.font_name = Some(name.to_string());
                cell.style.font_size = Some(size);
            }
        }
    }

    /// Thin box borders on populated cells in the row range.
    pub fn add_cell_borders(&mut self, start_row: usize, stop_row: Option<usize>) {
        for r in 0..self.rows.len() {
            let row_num = r + 1;
            if row_num < start_row {
                continue;
            }
            if stop_row == Some(row_num) {
                break;
            }
            for cell in &mut self.rows[r] {
                cell.style.border = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(rows: &[&[&str]]) -> GridTable {
        let mut table = GridTable::new();
        for row in rows {
            table.append_row(row.iter().copied());
        }
        table
    }

    fn fill_of(table: &GridTable, col: &str, row: usize) -> Option<Fill> {
        table.style(col, row).unwrap().fill
    }

    #[test]
    fn default_palette_entries() {
        let palette = Palette::default();
        assert_eq!(palette.get("red"), Some(Fill::rgb(0xFF0000)));
        assert_eq!(palette.get("RED"), Some(Fill::rgb(0xFF0000)));
        assert_eq!(palette.get("gray"), Some(Fill::rgb(0xC0C0C0)));
        assert_eq!(palette.get("magenta"), None);
    }

    #[test]
    fn verify_length_flags_wrong_lengths() {
        let mut table = table_from(&[&["", "cat"], &["", "na"], &["", "dogs"]]);
        let palette = Palette::default();

        table
            .verify_length("B", 3, "red", &["na"], 1, None, &palette)
            .unwrap();

        assert_eq!(fill_of(&table, "B", 1), None);
        assert_eq!(fill_of(&table, "B", 2), None); // skipped
        assert_eq!(fill_of(&table, "B", 3), Some(Fill::rgb(0xFF0000)));
    }

    #[test]
    fn unknown_color_is_a_noop() {
        let mut table = table_from(&[&["abcd"]]);
        let palette = Palette::default();

        table
            .verify_length("A", 1, "chartreuse", &[], 1, None, &palette)
            .unwrap();

        assert_eq!(fill_of(&table, "A", 1), None);
    }

    #[test]
    fn injected_palette_overrides_defaults() {
        let mut palette = Palette::empty();
        palette.insert("alert", Fill::rgb(0x123456));

        let mut table = table_from(&[&["xx"]]);
        table
            .verify_length("A", 3, "alert", &[], 1, None, &palette)
            .unwrap();

        assert_eq!(fill_of(&table, "A", 1), Some(Fill::rgb(0x123456)));
    }

    #[test]
    fn highlight_matching_rows_fills_whole_row() {
        let mut table = table_from(&[
            &["invoice", "10"],
            &["credit", "20"],
            &["INVOICE adj", "30"],
        ]);
        let palette = Palette::default();

        table
            .highlight_matching_rows("A", "invoice", "yellow", 1, &palette)
            .unwrap();

        let yellow = Some(Fill::rgb(0xFFFF00));
        assert_eq!(fill_of(&table, "A", 1), yellow);
        assert_eq!(fill_of(&table, "B", 1), yellow);
        assert_eq!(fill_of(&table, "A", 2), None);
        assert_eq!(fill_of(&table, "A", 3), yellow);
    }

    #[test]
    fn alternating_highlight_skips_rows() {
        let mut table = table_from(&[&["1"], &["2"], &["3"], &["4"], &["5"]]);
        let palette = Palette::default();

        table.highlight_rows(2, Some(5), "gray", true, &palette);

        let gray = Some(Fill::rgb(0xC0C0C0));
        assert_eq!(fill_of(&table, "A", 1), None);
        assert_eq!(fill_of(&table, "A", 2), gray);
        assert_eq!(fill_of(&table, "A", 3), None);
        assert_eq!(fill_of(&table, "A", 4), gray);
        assert_eq!(fill_of(&table, "A", 5), None); // stop_row excluded
    }

    #[test]
    fn bold_borders_and_font_passes() {
        let mut table = table_from(&[&["h1", "h2"], &["a", "b"], &["c", "d"]]);

        table.set_bold_rows(1, Some(2));
        table.add_cell_borders(1, None);
        table.set_table_font("Arial", 8.0);

        assert!(table.style("A", 1).unwrap().bold);
        assert!(!table.style("A", 2).unwrap().bold);
        assert!(table.style("B", 3).unwrap().border);
        let style = table.style("B", 2).unwrap();
        assert_eq!(style.font_name.as_deref(), Some("Arial"));
        assert_eq!(style.font_size, Some(8.0));
    }
}
