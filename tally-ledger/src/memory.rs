//! In-process ledger store.
//!
//! Enforces the same integrity rules as the SQLite store: unique primary keys
//! and `month_id` references into `months`.

use std::collections::{BTreeMap, HashSet};

use tally_core::Table;

use crate::error::{LedgerError, Result};
use crate::store::{Key, LedgerStore, Row, check_shape, month_ref, row_key};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: BTreeMap<Table, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with every ledger table created.
    pub fn with_all_tables() -> Self {
        Self {
            tables: Table::ALL.into_iter().map(|t| (t, Vec::new())).collect(),
        }
    }

    pub fn rows(&self, table: Table) -> Option<&[Row]> {
        self.tables.get(&table).map(Vec::as_slice)
    }

    fn table(&self, table: Table) -> Result<&Vec<Row>> {
        self.tables
            .get(&table)
            .ok_or_else(|| LedgerError::MissingTable(table.name().to_string()))
    }
}

impl LedgerStore for MemoryStore {
    fn select_existing_keys(&self, table: Table) -> Result<HashSet<Key>> {
        Ok(self.table(table)?.iter().map(|r| row_key(table, r)).collect())
    }

    fn insert_rows(&mut self, table: Table, rows: &[Row]) -> Result<usize> {
        let mut keys = self.select_existing_keys(table)?;
        let months = if table.references_months() {
            self.select_existing_keys(Table::Months)?
        } else {
            HashSet::new()
        };

        // validate the whole batch before touching the table
        for row in rows {
            check_shape(table, row)?;
            if let Some(month_id) = month_ref(table, row) {
                if !months.contains(&vec![month_id.clone()]) {
                    return Err(LedgerError::MissingPeriod {
                        table: table.name().to_string(),
                        month_id,
                    });
                }
            }
            let key = row_key(table, row);
            if !keys.insert(key.clone()) {
                return Err(LedgerError::DuplicateKey {
                    table: table.name().to_string(),
                    key: key.join(", "),
                });
            }
        }

        let target = self
            .tables
            .get_mut(&table)
            .ok_or_else(|| LedgerError::MissingTable(table.name().to_string()))?;
        target.extend(rows.iter().cloned());
        Ok(rows.len())
    }

    fn create_table(&mut self, table: Table) -> Result<()> {
        self.tables.entry(table).or_default();
        Ok(())
    }

    fn drop_table(&mut self, table: Table) -> Result<()> {
        self.tables.remove(&table);
        Ok(())
    }

    fn table_exists(&self, table: Table) -> Result<bool> {
        Ok(self.tables.contains_key(&table))
    }

    fn row_count(&self, table: Table) -> Result<usize> {
        Ok(self.table(table)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{LedgerRecord, MonthRecord, Period, Value};

    fn month(key: &str) -> Row {
        MonthRecord::for_period(Period::parse(key).unwrap()).values()
    }

    fn income(id: &str, month_id: &str) -> Row {
        vec![
            id.into(),
            "Salary".into(),
            Value::Null,
            month_id.into(),
            Value::Integer(100),
        ]
    }

    #[test]
    fn test_missing_table() {
        let store = MemoryStore::new();
        let err = store.select_existing_keys(Table::Months).unwrap_err();
        assert!(matches!(err, LedgerError::MissingTable(ref t) if t == "months"));
    }

    #[test]
    fn test_month_reference_enforced() {
        let mut store = MemoryStore::with_all_tables();
        let err = store
            .insert_rows(Table::Income, &[income("FEB 23 0000", "FEB 23")])
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingPeriod { .. }));
        assert_eq!(store.row_count(Table::Income).unwrap(), 0);

        store.insert_rows(Table::Months, &[month("FEB 23")]).unwrap();
        store
            .insert_rows(Table::Income, &[income("FEB 23 0000", "FEB 23")])
            .unwrap();
        assert_eq!(store.row_count(Table::Income).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_key_rejects_whole_batch() {
        let mut store = MemoryStore::with_all_tables();
        let err = store
            .insert_rows(Table::Months, &[month("FEB 23"), month("MAR 23"), month("FEB 23")])
            .unwrap_err();
        assert_eq!(err.error_code(), "INTEGRITY_ERROR");
        assert_eq!(store.row_count(Table::Months).unwrap(), 0);
    }

    #[test]
    fn test_drop_and_create() {
        let mut store = MemoryStore::with_all_tables();
        store.insert_rows(Table::Months, &[month("FEB 23")]).unwrap();
        store.drop_table(Table::Months).unwrap();
        assert!(!store.table_exists(Table::Months).unwrap());
        store.create_table(Table::Months).unwrap();
        assert_eq!(store.row_count(Table::Months).unwrap(), 0);
    }
}
