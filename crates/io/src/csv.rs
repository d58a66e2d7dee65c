// CSV import

use std::io::Read;
use std::path::Path;

use gridtable_engine::table::GridTable;

use crate::error::IoError;

/// Append every CSV record to the table as a row of text cells.
/// Returns the number of rows appended.
pub fn append_from_csv(table: &mut GridTable, path: &Path) -> Result<usize, IoError> {
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut appended = 0;
    for result in reader.records() {
        let record = result.map_err(|e| IoError::Csv(e.to_string()))?;
        table.append_row(record.iter());
        appended += 1;
    }
    Ok(appended)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252,
/// common for Excel-exported CSVs).
fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use gridtable_engine::cell::CellValue;
    use tempfile::tempdir;

    #[test]
    fn appends_after_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "Name,Age\nAlice,30\nBob,25\n").unwrap();

        let mut table = GridTable::new();
        table.set_value("A", 1, "existing").unwrap();

        let appended = append_from_csv(&mut table, &path).unwrap();

        assert_eq!(appended, 3);
        assert_eq!(table.value("A", 2).unwrap(), &CellValue::Text("Name".into()));
        assert_eq!(table.value("B", 3).unwrap(), &CellValue::Text("30".into()));
        assert_eq!(table.value("B", 4).unwrap(), &CellValue::Text("25".into()));
    }

    #[test]
    fn ragged_rows_keep_their_lengths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b,c\nd\n").unwrap();

        let mut table = GridTable::new();
        append_from_csv(&mut table, &path).unwrap();

        assert_eq!(table.value("C", 1).unwrap(), &CellValue::Text("c".into()));
        assert_eq!(table.value("C", 2).unwrap(), &CellValue::Empty);
    }

    #[test]
    fn windows_1252_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Café" with a Windows-1252 e-acute
        fs::write(&path, b"Caf\xe9,1\n").unwrap();

        let mut table = GridTable::new();
        append_from_csv(&mut table, &path).unwrap();

        assert_eq!(
            table.value("A", 1).unwrap(),
            &CellValue::Text("Caf\u{e9}".into())
        );
    }
}
