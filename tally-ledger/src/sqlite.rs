//! SQLite ledger store.
//!
//! Table and column names come from the static table definitions and are
//! always quoted; storage names such as `Interest (%)` contain spaces.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use tally_core::schema::TIMESTAMP_FORMAT;
use tally_core::{Table, Value};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::store::{Key, LedgerStore, Row, check_shape};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| tally_core::Error::io(parent, e))?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn ensure_exists(&self, table: Table) -> Result<()> {
        if self.table_exists(table)? {
            Ok(())
        } else {
            Err(LedgerError::MissingTable(table.name().to_string()))
        }
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn create_sql(table: Table) -> String {
    let mut defs: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote(c.storage), c.kind.sql()))
        .collect();
    let key: Vec<String> = table
        .primary_key_indices()
        .into_iter()
        .map(|i| quote(table.columns()[i].storage))
        .collect();
    defs.push(format!("PRIMARY KEY ({})", key.join(", ")));
    if table.references_months() {
        defs.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            quote("month_id"),
            quote(Table::Months.name()),
            quote("id")
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quote(table.name()),
        defs.join(",\n    ")
    )
}

fn insert_sql(table: Table) -> String {
    let columns: Vec<String> = table.columns().iter().map(|c| quote(c.storage)).collect();
    let params: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table.name()),
        columns.join(", "),
        params.join(", ")
    )
}

/// Storage form of a cell. Decimals and timestamps are written as text.
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Decimal(d) => SqlValue::Text(d.normalize().to_string()),
        Value::Timestamp(ts) => SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}

fn render(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

impl LedgerStore for SqliteStore {
    fn select_existing_keys(&self, table: Table) -> Result<HashSet<Key>> {
        self.ensure_exists(table)?;
        let columns = self.primary_key_columns(table);
        let sql = format!(
            "SELECT {} FROM {}",
            columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", "),
            quote(table.name())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let keys = stmt
            .query_map([], |row| {
                (0..columns.len())
                    .map(|i| row.get_ref(i).map(render))
                    .collect::<rusqlite::Result<Key>>()
            })?
            .collect::<rusqlite::Result<HashSet<Key>>>()?;
        Ok(keys)
    }

    fn insert_rows(&mut self, table: Table, rows: &[Row]) -> Result<usize> {
        for row in rows {
            check_shape(table, row)?;
        }
        self.ensure_exists(table)?;

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql(table))?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter().map(to_sql)))?;
            }
        }
        tx.commit()?;
        debug!(table = table.name(), rows = rows.len(), "committed insert batch");
        Ok(rows.len())
    }

    fn create_table(&mut self, table: Table) -> Result<()> {
        self.conn.execute_batch(&create_sql(table))?;
        Ok(())
    }

    fn drop_table(&mut self, table: Table) -> Result<()> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {}", quote(table.name())))?;
        Ok(())
    }

    fn table_exists(&self, table: Table) -> Result<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table.name()],
            |r| r.get(0),
        )?;
        Ok(found > 0)
    }

    fn row_count(&self, table: Table) -> Result<usize> {
        self.ensure_exists(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM {}", quote(table.name())),
            [],
            |r| r.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
