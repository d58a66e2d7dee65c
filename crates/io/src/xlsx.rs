// Excel file import (xlsx, xls) and export (xlsx only)
//
// Import: values become typed cells; styling in the source file is not
// read back. Export: writes cell values plus the table's style
// metadata. Not a round-trip format for styles.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook as XlsxWorkbook};

use gridtable_engine::cell::{CellStyle, CellValue};
use gridtable_engine::table::GridTable;

use crate::error::IoError;

enum FileKind {
    Xlsx,
    Xls,
}

fn file_kind(path: &Path) -> Result<FileKind, IoError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    {
        Some(ext) if ext == "xlsx" => Ok(FileKind::Xlsx),
        Some(ext) if ext == "xls" => Ok(FileKind::Xls),
        _ => Err(IoError::UnsupportedFileKind(format!(
            "'{}': expected .xlsx or .xls",
            path.display()
        ))),
    }
}

/// Sheet names in a workbook, in file order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, IoError> {
    file_kind(path)?;
    let workbook = open_workbook_auto(path)
        .map_err(|e| IoError::Workbook(format!("failed to open '{}': {}", path.display(), e)))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Load a workbook into a table. Single-sheet files load directly;
/// multi-sheet files need [`load_sheet`].
pub fn load(path: &Path) -> Result<GridTable, IoError> {
    file_kind(path)?;
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::Workbook(format!("failed to open '{}': {}", path.display(), e)))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    match names.as_slice() {
        [] => Err(IoError::MissingSheet(format!(
            "'{}' contains no sheets",
            path.display()
        ))),
        [only] => read_sheet(&mut workbook, only),
        _ => Err(IoError::MissingSheet(format!(
            "'{}' has multiple sheets ({}); pick one with load_sheet",
            path.display(),
            names.join(", ")
        ))),
    }
}

/// Load a named sheet from a workbook.
pub fn load_sheet(path: &Path, sheet: &str) -> Result<GridTable, IoError> {
    file_kind(path)?;
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::Workbook(format!("failed to open '{}': {}", path.display(), e)))?;
    read_sheet(&mut workbook, sheet)
}

/// Convert a legacy `.xls` sheet into a fresh table. Styling in the
/// legacy file is not carried over.
pub fn convert_legacy(path: &Path, sheet: &str) -> Result<GridTable, IoError> {
    if !matches!(file_kind(path)?, FileKind::Xls) {
        return Err(IoError::UnsupportedFileKind(format!(
            "'{}': convert_legacy expects a .xls file",
            path.display()
        )));
    }
    load_sheet(path, sheet)
}

fn read_sheet(
    workbook: &mut Sheets<BufReader<File>>,
    sheet: &str,
) -> Result<GridTable, IoError> {
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| IoError::MissingSheet(format!("sheet '{}': {}", sheet, e)))?;

    let mut table = GridTable::with_name(sheet);

    // Data may not begin at A1
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    for (row_idx, row) in range.rows().enumerate() {
        let target_row = start_row as usize + row_idx;
        for (col_idx, cell) in row.iter().enumerate() {
            let target_col = start_col as usize + col_idx;
            match cell {
                Data::Empty => {}
                Data::String(s) => {
                    if !s.is_empty() {
                        table.set_value_at(target_row, target_col, s.as_str());
                    }
                }
                Data::Float(n) => table.set_value_at(target_row, target_col, *n),
                Data::Int(n) => table.set_value_at(target_row, target_col, *n),
                Data::Bool(b) => table.set_value_at(target_row, target_col, *b),
                Data::DateTime(dt) => {
                    // Serials that don't convert to a calendar value are
                    // dropped rather than imported as raw numbers
                    if let Some(datetime) = dt.as_datetime() {
                        table.set_value_at(target_row, target_col, datetime);
                    }
                }
                Data::DateTimeIso(s) => table.set_value_at(target_row, target_col, s.as_str()),
                Data::DurationIso(s) => table.set_value_at(target_row, target_col, s.as_str()),
                Data::Error(e) => {
                    table.set_value_at(target_row, target_col, format!("#{:?}", e))
                }
            }
        }
    }

    Ok(table)
}

/// Write the table to an `.xlsx` file, sheet named after the table.
pub fn save(table: &GridTable, path: &Path) -> Result<(), IoError> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&table.name)
        .map_err(|e| IoError::Workbook(format!("failed to name sheet '{}': {}", table.name, e)))?;

    for (r, row) in table.iter_rows().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let row32 = r as u32;
            let col16 = c as u16;
            let format = excel_format(&cell.style);

            match &cell.value {
                CellValue::Empty => {
                    // Only worth writing if the cell carries styling
                    if !cell.style.is_plain() {
                        worksheet.write_blank(row32, col16, &format).map_err(|e| {
                            IoError::Workbook(format!("failed to write cell ({}, {}): {}", r, c, e))
                        })?;
                    }
                }
                CellValue::Text(s) => {
                    worksheet
                        .write_string_with_format(row32, col16, s, &format)
                        .map_err(|e| {
                            IoError::Workbook(format!("failed to write cell ({}, {}): {}", r, c, e))
                        })?;
                }
                CellValue::Int(n) => {
                    worksheet
                        .write_number_with_format(row32, col16, *n as f64, &format)
                        .map_err(|e| {
                            IoError::Workbook(format!("failed to write cell ({}, {}): {}", r, c, e))
                        })?;
                }
                CellValue::Float(n) => {
                    worksheet
                        .write_number_with_format(row32, col16, *n, &format)
                        .map_err(|e| {
                            IoError::Workbook(format!("failed to write cell ({}, {}): {}", r, c, e))
                        })?;
                }
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean_with_format(row32, col16, *b, &format)
                        .map_err(|e| {
                            IoError::Workbook(format!("failed to write cell ({}, {}): {}", r, c, e))
                        })?;
                }
                CellValue::DateTime(dt) => {
                    // Without an explicit number format Excel would show
                    // the raw serial
                    let format = if cell.style.number_format.is_some() {
                        format
                    } else {
                        format.set_num_format("mm/dd/yyyy hh:mm")
                    };
                    worksheet
                        .write_datetime_with_format(row32, col16, dt, &format)
                        .map_err(|e| {
                            IoError::Workbook(format!("failed to write cell ({}, {}): {}", r, c, e))
                        })?;
                }
            }
        }
    }

    for (col, width) in table.column_widths() {
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| IoError::Workbook(format!("failed to size column {}: {}", col, e)))?;
    }
    for (row, height) in table.row_heights() {
        worksheet
            .set_row_height(row as u32, height)
            .map_err(|e| IoError::Workbook(format!("failed to size row {}: {}", row, e)))?;
    }

    workbook
        .save(path)
        .map_err(|e| IoError::Workbook(format!("failed to save '{}': {}", path.display(), e)))?;
    Ok(())
}

fn excel_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if let Some(fill) = style.fill {
        format = format.set_background_color(Color::RGB(fill.as_rgb()));
    }
    if let Some(num_format) = &style.number_format {
        format = format.set_num_format(num_format.as_str());
    }
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }
    if let Some(name) = &style.font_name {
        format = format.set_font_name(name.as_str());
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    format
}
