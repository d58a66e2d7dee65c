// Extraction family - materializing grid data into plain containers
// and writing record sets back onto a grid

use crate::addr;
use crate::cell::CellValue;
use crate::error::GridError;
use crate::table::GridTable;

/// One extracted row: a key plus (header label, value) fields in
/// requested-column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| value)
    }
}

/// Insertion-ordered record set. Inserting an existing key overwrites
/// that record's fields but keeps its position. Key uniqueness is the
/// caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    records: Vec<Record>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, key: String, fields: Vec<(String, CellValue)>) {
        if let Some(existing) = self.records.iter_mut().find(|rec| rec.key == key) {
            existing.fields = fields;
        } else {
            self.records.push(Record { key, fields });
        }
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.iter().find(|rec| rec.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

impl GridTable {
    /// Snapshot of rows `start_row..=stop_row` as plain values, columns
    /// in sheet order including gaps. `stop_row` defaults to the last
    /// row.
    pub fn to_rows(&self, start_row: usize, stop_row: Option<usize>) -> Vec<Vec<CellValue>> {
        let stop = stop_row.unwrap_or_else(|| self.max_row());
        let mut out = Vec::new();
        for r in 0..self.rows.len() {
            let row_num = r + 1;
            if row_num < start_row || row_num > stop {
                continue;
            }
            out.push(self.rows[r].iter().map(|cell| cell.value.clone()).collect());
        }
        out
    }

    /// Build records from the grid: one per data row, keyed by the
    /// stringified `key_col` value, or by a zero-padded 4-digit row
    /// number when `key_col` is `None`. Rows with an empty key are
    /// skipped; duplicate keys silently overwrite earlier entries.
    /// Field labels come from `header_row`; `data_start_row` defaults to
    /// the row after it.
    pub fn to_records(
        &self,
        data_cols: &[&str],
        key_col: Option<&str>,
        header_row: usize,
        data_start_row: Option<usize>,
    ) -> Result<Records, GridError> {
        if header_row == 0 {
            return Err(GridError::InvalidAddress("row 0".to_string()));
        }
        let key_idx = match key_col {
            Some(col) => Some(addr::letter_to_col(col)?),
            None => None,
        };
        let mut col_indices = Vec::with_capacity(data_cols.len());
        for col in data_cols {
            col_indices.push(addr::letter_to_col(col)?);
        }
        let data_start = data_start_row.unwrap_or(header_row + 1);

        let labels: Vec<String> = col_indices
            .iter()
            .map(|&c| {
                self.rows
                    .get(header_row - 1)
                    .and_then(|row| row.get(c))
                    .map(|cell| cell.value.to_display_string())
                    .unwrap_or_default()
            })
            .collect();

        let mut records = Records::new();
        for r in 0..self.rows.len() {
            let row_num = r + 1;
            if row_num < data_start {
                continue;
            }
            let key = match key_idx {
                Some(c) => self.rows[r]
                    .get(c)
                    .map(|cell| cell.value.to_display_string())
                    .unwrap_or_default(),
                None => format!("{:04}", row_num),
            };
            if key.is_empty() {
                continue;
            }

            let fields = labels
                .iter()
                .cloned()
                .zip(col_indices.iter().map(|&c| {
                    self.rows[r]
                        .get(c)
                        .map(|cell| cell.value.clone())
                        .unwrap_or_default()
                }))
                .collect();
            records.insert(key, fields);
        }
        Ok(records)
    }

    /// Inverse of [`to_records`](Self::to_records): the first-seen-order
    /// union of field labels becomes the header row, then one row per
    /// record. A record missing a label writes an empty cell.
    /// `start_row` defaults to the row after `header_row` and is pushed
    /// there when it collides with it.
    pub fn write_records(&mut self, records: &Records, header_row: usize, start_row: Option<usize>) {
        let header_row = header_row.max(1);
        let mut start = start_row.unwrap_or(header_row + 1);
        if start <= header_row {
            start = header_row + 1;
        }

        let mut labels: Vec<String> = Vec::new();
        for record in records.iter() {
            for (label, _) in &record.fields {
                if !labels.iter().any(|existing| existing == label) {
                    labels.push(label.clone());
                }
            }
        }

        for (c, label) in labels.iter().enumerate() {
            self.cell_mut(header_row - 1, c).value = CellValue::from(label.clone());
        }

        for (offset, record) in records.iter().enumerate() {
            let r = start - 1 + offset;
            for (c, label) in labels.iter().enumerate() {
                let value = record
                    .get(label)
                    .cloned()
                    .unwrap_or_default();
                self.cell_mut(r, c).value = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> GridTable {
        let mut table = GridTable::new();
        table.append_row(["ID", "Name", "Amount"]);
        table.append_row(["a1", "Alice", "10"]);
        table.append_row(["b2", "Bob", "20"]);
        table
    }

    #[test]
    fn to_rows_covers_range_with_gaps() {
        let mut table = GridTable::new();
        table.append_row(["a", "", "c"]);
        table.append_row(["d"]);
        table.append_row(["e"]);

        let rows = table.to_rows(1, Some(2));

        assert_eq!(
            rows,
            vec![
                vec![
                    CellValue::Text("a".into()),
                    CellValue::Empty,
                    CellValue::Text("c".into()),
                ],
                vec![CellValue::Text("d".into())],
            ]
        );
    }

    #[test]
    fn to_records_keys_from_column() {
        let table = sample_table();

        let records = table
            .to_records(&["B", "C"], Some("A"), 1, None)
            .unwrap();

        assert_eq!(records.len(), 2);
        let alice = records.get("a1").unwrap();
        assert_eq!(alice.get("Name"), Some(&CellValue::Text("Alice".into())));
        assert_eq!(alice.get("Amount"), Some(&CellValue::Text("10".into())));
    }

    #[test]
    fn to_records_row_number_keys_when_no_key_column() {
        let table = sample_table();

        let records = table.to_records(&["B"], None, 1, None).unwrap();

        let keys: Vec<&str> = records.iter().map(|rec| rec.key.as_str()).collect();
        assert_eq!(keys, vec!["0002", "0003"]);
    }

    #[test]
    fn to_records_skips_empty_keys_and_overwrites_duplicates() {
        let mut table = GridTable::new();
        table.append_row(["ID", "Name"]);
        table.append_row(["x", "first"]);
        table.append_row(["", "skipped"]);
        table.append_row(["x", "second"]);

        let records = table.to_records(&["B"], Some("A"), 1, None).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records.get("x").unwrap().get("Name"),
            Some(&CellValue::Text("second".into()))
        );
    }

    #[test]
    fn records_round_trip_through_sheet() {
        let table = sample_table();
        let records = table.to_records(&["B", "C"], Some("A"), 1, None).unwrap();

        let mut out = GridTable::new();
        out.write_records(&records, 1, None);

        assert_eq!(out.value("A", 1).unwrap(), &CellValue::Text("Name".into()));
        assert_eq!(out.value("B", 1).unwrap(), &CellValue::Text("Amount".into()));
        assert_eq!(out.value("A", 2).unwrap(), &CellValue::Text("Alice".into()));
        assert_eq!(out.value("B", 3).unwrap(), &CellValue::Text("20".into()));
    }

    #[test]
    fn write_records_unions_labels_in_first_seen_order() {
        let mut records = Records::new();
        records.insert(
            "r1".into(),
            vec![("Name".into(), CellValue::Text("Alice".into()))],
        );
        records.insert(
            "r2".into(),
            vec![
                ("City".into(), CellValue::Text("Paris".into())),
                ("Name".into(), CellValue::Text("Bob".into())),
            ],
        );

        let mut out = GridTable::new();
        out.write_records(&records, 1, None);

        // Header union: Name (from r1), then City (first seen in r2)
        assert_eq!(out.value("A", 1).unwrap(), &CellValue::Text("Name".into()));
        assert_eq!(out.value("B", 1).unwrap(), &CellValue::Text("City".into()));
        // r1 has no City -> empty cell
        assert_eq!(out.value("B", 2).unwrap(), &CellValue::Empty);
        assert_eq!(out.value("A", 3).unwrap(), &CellValue::Text("Bob".into()));
        assert_eq!(out.value("B", 3).unwrap(), &CellValue::Text("Paris".into()));
    }

    #[test]
    fn write_records_coerces_colliding_start_row() {
        let mut records = Records::new();
        records.insert("k".into(), vec![("H".into(), CellValue::Int(1))]);

        let mut out = GridTable::new();
        out.write_records(&records, 2, Some(2));

        assert_eq!(out.value("A", 2).unwrap(), &CellValue::Text("H".into()));
        assert_eq!(out.value("A", 3).unwrap(), &CellValue::Int(1));
    }
}
