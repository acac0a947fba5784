// Summary Table
// Aligns heterogeneous attribute maps into one tabular collection

use crate::parser::models::{ParamMap, Scalar};

use serde_json::{Map as JsonMap, Value as JsonValue};

/// A tabular collection built from per-combination attribute maps.
///
/// Columns are the union of every key seen across the input records, in
/// first-seen order; a record missing a column contributes a null cell,
/// never a zero. Rows keep the input record order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Scalar>>>,
}

impl SummaryTable {
    /// Build a table from attribute maps, one row per record.
    pub fn from_records(records: &[ParamMap]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).cloned())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Scalar> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// Render as delimited text. The header row is always present; null
    /// cells render as empty fields.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        let header: Vec<String> = self.columns.iter().map(|c| csv_escape(c)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(value) => csv_escape(&value.to_string()),
                    None => String::new(),
                })
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }

        out
    }

    /// Render as a column-oriented JSON object: each column maps to its
    /// value array, with `null` for missing cells.
    pub fn to_columnar_json(&self) -> JsonValue {
        let mut object = JsonMap::new();
        for (col, name) in self.columns.iter().enumerate() {
            let values: Vec<JsonValue> = self
                .rows
                .iter()
                .map(|row| match &row[col] {
                    Some(value) => serde_json::to_value(value).unwrap_or(JsonValue::Null),
                    None => JsonValue::Null,
                })
                .collect();
            object.insert(name.clone(), JsonValue::Array(values));
        }
        JsonValue::Object(object)
    }
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Scalar)]) -> ParamMap {
        let mut m = ParamMap::new();
        for (k, v) in pairs {
            m.insert(k.to_string(), v.clone());
        }
        m
    }

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let records = vec![
            record(&[("H", Scalar::Float(1.0)), ("S", Scalar::Float(0.5))]),
            record(&[("H", Scalar::Float(2.0)), ("REASON", Scalar::from("bad"))]),
        ];
        let table = SummaryTable::from_records(&records);
        assert_eq!(table.columns(), &["H", "S", "REASON"]);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_missing_cells_are_null_not_zero() {
        let records = vec![
            record(&[("A", Scalar::Int(1))]),
            record(&[("B", Scalar::Int(2))]),
        ];
        let table = SummaryTable::from_records(&records);
        assert_eq!(table.cell(0, "A"), Some(&Scalar::Int(1)));
        assert_eq!(table.cell(0, "B"), None);
        assert_eq!(table.cell(1, "A"), None);
    }

    #[test]
    fn test_empty_records_make_empty_table() {
        let table = SummaryTable::from_records(&[]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv(), "\n");
    }

    #[test]
    fn test_csv_rendering() {
        let records = vec![
            record(&[("H", Scalar::Float(1.0)), ("BC", Scalar::from("PER_BC"))]),
            record(&[("H", Scalar::Float(2.0))]),
        ];
        let csv = SummaryTable::from_records(&records).to_csv();
        assert_eq!(csv, "H,BC\n1.0,PER_BC\n2.0,\n");
    }

    #[test]
    fn test_csv_escapes_delimiters() {
        let records = vec![record(&[("NOTE", Scalar::from("too high, aborted"))])];
        let csv = SummaryTable::from_records(&records).to_csv();
        assert!(csv.contains("\"too high, aborted\""));
    }

    #[test]
    fn test_columnar_json_shape() {
        let records = vec![
            record(&[("H", Scalar::Float(1.0))]),
            record(&[("H", Scalar::Float(2.0)), ("S", Scalar::Int(3))]),
        ];
        let json = SummaryTable::from_records(&records).to_columnar_json();
        assert_eq!(json["H"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["S"], serde_json::json!([null, 3]));
    }
}
