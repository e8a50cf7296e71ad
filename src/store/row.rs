//! Positional rows as the store exchanges them.
//!
//! Rows are plain `Vec<Value>` in column order; callers that need typed access
//! go through [`RowReader`], which reports the table and column on mismatch.

use crate::core::{GameError, Result};
use serde_json::Value;

pub type Row = Vec<Value>;

/// Encodes a boolean the way the tables store flags (0/1).
pub fn flag(value: bool) -> Value {
    Value::from(u8::from(value))
}

pub struct RowReader<'a> {
    table: &'static str,
    columns: &'static [&'static str],
    row: &'a [Value],
}

impl<'a> RowReader<'a> {
    pub fn new(table: &'static str, columns: &'static [&'static str], row: &'a [Value]) -> Result<Self> {
        if row.len() < columns.len() {
            return Err(GameError::MalformedRow(format!(
                "{table}: expected {} columns, got {}",
                columns.len(),
                row.len()
            )));
        }
        Ok(Self { table, columns, row })
    }

    fn mismatch(&self, idx: usize, expected: &str) -> GameError {
        let column = self.columns.get(idx).copied().unwrap_or("?");
        GameError::MalformedRow(format!(
            "{}.{} (index {}): expected {}, got {}",
            self.table, column, idx, expected, self.row[idx]
        ))
    }

    pub fn value(&self, idx: usize) -> &Value {
        &self.row[idx]
    }

    pub fn u64(&self, idx: usize) -> Result<u64> {
        match &self.row[idx] {
            Value::Number(n) => n.as_u64().ok_or_else(|| self.mismatch(idx, "unsigned integer")),
            Value::Bool(b) => Ok(u64::from(*b)),
            Value::Null => Ok(0),
            _ => Err(self.mismatch(idx, "unsigned integer")),
        }
    }

    pub fn u32(&self, idx: usize) -> Result<u32> {
        let value = self.u64(idx)?;
        u32::try_from(value).map_err(|_| self.mismatch(idx, "32-bit integer"))
    }

    pub fn i64(&self, idx: usize) -> Result<i64> {
        match &self.row[idx] {
            Value::Number(n) => n.as_i64().ok_or_else(|| self.mismatch(idx, "integer")),
            Value::Null => Ok(0),
            _ => Err(self.mismatch(idx, "integer")),
        }
    }

    pub fn string(&self, idx: usize) -> Result<String> {
        match &self.row[idx] {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            _ => Err(self.mismatch(idx, "text")),
        }
    }

    pub fn flag(&self, idx: usize) -> Result<bool> {
        match &self.row[idx] {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
            Value::Null => Ok(false),
            _ => Err(self.mismatch(idx, "flag")),
        }
    }

    pub fn malformed(&self, idx: usize, expected: &str) -> GameError {
        self.mismatch(idx, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[&str] = &["id", "name", "is_equipped", "delta"];

    #[test]
    fn test_reads_typed_columns() {
        let row = vec![json!(4), json!("Axe"), flag(true), json!(-3)];
        let reader = RowReader::new("items", COLUMNS, &row).unwrap();
        assert_eq!(reader.u64(0).unwrap(), 4);
        assert_eq!(reader.string(1).unwrap(), "Axe");
        assert!(reader.flag(2).unwrap());
        assert_eq!(reader.i64(3).unwrap(), -3);
    }

    #[test]
    fn test_short_row_rejected() {
        let row = vec![json!(1)];
        assert!(matches!(
            RowReader::new("items", COLUMNS, &row),
            Err(GameError::MalformedRow(_))
        ));
    }

    #[test]
    fn test_type_mismatch_names_column() {
        let row = vec![json!("x"), json!("Axe"), flag(false), json!(0)];
        let reader = RowReader::new("items", COLUMNS, &row).unwrap();
        let err = reader.u64(0).unwrap_err().to_string();
        assert!(err.contains("items.id"), "{err}");
    }

    #[test]
    fn test_null_reads_as_zero() {
        let row = vec![Value::Null, Value::Null, Value::Null, Value::Null];
        let reader = RowReader::new("items", COLUMNS, &row).unwrap();
        assert_eq!(reader.u64(0).unwrap(), 0);
        assert_eq!(reader.string(1).unwrap(), "");
        assert!(!reader.flag(2).unwrap());
    }
}
