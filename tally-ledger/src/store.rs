//! Storage seam for the ledger.

use std::collections::HashSet;

use tally_core::{Table, Value};

use crate::error::{LedgerError, Result};

/// One row of cells in the table's column order.
pub type Row = Vec<Value>;

/// Primary-key values of a row, rendered as text so keys read back from a
/// store compare equal to keys computed from candidate rows.
pub type Key = Vec<String>;

pub trait LedgerStore {
    /// Storage names of the primary-key columns.
    fn primary_key_columns(&self, table: Table) -> Vec<&'static str> {
        table
            .primary_key_indices()
            .into_iter()
            .map(|i| table.columns()[i].storage)
            .collect()
    }

    fn select_existing_keys(&self, table: Table) -> Result<HashSet<Key>>;

    /// Insert rows as one unit; returns the number written.
    fn insert_rows(&mut self, table: Table, rows: &[Row]) -> Result<usize>;

    /// Create the table if it does not exist.
    fn create_table(&mut self, table: Table) -> Result<()>;

    /// Drop the table if it exists.
    fn drop_table(&mut self, table: Table) -> Result<()>;

    fn table_exists(&self, table: Table) -> Result<bool>;

    fn row_count(&self, table: Table) -> Result<usize>;
}

/// Primary-key values of `row`.
pub fn row_key(table: Table, row: &[Value]) -> Key {
    table
        .primary_key_indices()
        .into_iter()
        .map(|i| row.get(i).map(Value::render).unwrap_or_default())
        .collect()
}

/// Rows must have exactly one value per column.
pub fn check_shape(table: Table, row: &[Value]) -> Result<()> {
    let expected = table.columns().len();
    if row.len() == expected {
        Ok(())
    } else {
        Err(LedgerError::RowShape {
            table: table.name().to_string(),
            expected,
            found: row.len(),
        })
    }
}

/// Rendered `month_id` of a row, for tables that reference `months`.
pub fn month_ref(table: Table, row: &[Value]) -> Option<String> {
    table
        .column_index("month_id")
        .and_then(|i| row.get(i))
        .filter(|v| !v.is_null())
        .map(Value::render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_renders_primary_key() {
        let row: Row = vec!["FEB 23 0003".into(), "FEB 23".into()];
        assert_eq!(row_key(Table::Budget, &row), vec!["FEB 23 0003".to_string()]);
        assert_eq!(month_ref(Table::Budget, &row).as_deref(), Some("FEB 23"));
        assert_eq!(month_ref(Table::Months, &row), None);
    }

    #[test]
    fn test_check_shape() {
        let row: Row = vec![Value::Null; 2];
        assert!(check_shape(Table::Months, &row).is_ok());
        let err = check_shape(Table::Spending, &row).unwrap_err();
        assert_eq!(err.to_string(), "spending: row has 2 values, table has 11 columns");
    }
}
