//! Ledger table definitions.
//!
//! Each table has a fixed column order and an explicit mapping from the
//! canonical field name used in code to the storage column name. Records are
//! flattened into [`Value`] rows in exactly this order.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Timestamp format used when a value has to be rendered as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell destined for the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Canonical text form, used to compare keys regardless of how a store
    /// hands them back.
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.normalize().to_string(),
            Self::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Numeric,
    Timestamp,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::Numeric => "NUMERIC",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Canonical field name.
    pub field: &'static str,
    /// Column name in the ledger store.
    pub storage: &'static str,
    pub kind: ColumnType,
}

const fn col(field: &'static str, storage: &'static str, kind: ColumnType) -> Column {
    Column {
        field,
        storage,
        kind,
    }
}

use ColumnType::{Integer, Numeric, Text, Timestamp};

const MONTHS_COLUMNS: &[Column] = &[col("id", "id", Text), col("date", "Date", Timestamp)];

const SPENDING_COLUMNS: &[Column] = &[
    col("id", "id", Text),
    col("month_id", "month_id", Text),
    col("date", "Date", Timestamp),
    col("type", "Type", Text),
    col("name", "Name", Text),
    col("category", "Category", Text),
    col("subcategory", "Subcategory", Text),
    col("address", "Address", Text),
    col("description", "Description", Text),
    col("out", "Out", Integer),
    col("in", "In", Integer),
];

const BUDGET_COLUMNS: &[Column] = &[
    col("id", "id", Text),
    col("month_id", "month_id", Text),
    col("date", "Date", Timestamp),
    col("category", "Category", Text),
    col("subcategory", "Subcategory", Text),
    col("budget", "Budget", Integer),
];

const ACCOUNTS_COLUMNS: &[Column] = &[
    col("id", "id", Text),
    col("account", "Account", Text),
    col("date", "Date", Timestamp),
    col("month_id", "month_id", Text),
    col("balance", "Balance", Integer),
];

const INCOME_COLUMNS: &[Column] = &[
    col("id", "id", Text),
    col("type", "Type", Text),
    col("date", "Date", Timestamp),
    col("month_id", "month_id", Text),
    col("amount", "Amount", Integer),
];

const INVESTMENTS_VARIABLE_COLUMNS: &[Column] = &[
    col("id", "id", Text),
    col("name", "Name", Text),
    col("date", "Date", Timestamp),
    col("month_id", "month_id", Text),
    col("company", "Company", Text),
    col("unit_price", "Unit Price", Numeric),
    col("units_owned", "Units Owned", Numeric),
    col("value", "Value", Numeric),
];

const INVESTMENTS_FIXED_COLUMNS: &[Column] = &[
    col("id", "id", Text),
    col("name", "Name", Text),
    col("company", "Company", Text),
    col("amount", "Amount", Integer),
    col("interest", "Interest (%)", Numeric),
    col("duration_months", "Months", Integer),
    col("purchased", "Purchased", Timestamp),
    col("matures", "Matures", Timestamp),
    col("return", "Return", Integer),
];

/// Ledger tables, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Table {
    Months,
    Spending,
    Budget,
    Accounts,
    Income,
    InvestmentsVariable,
    InvestmentsFixed,
}

impl Table {
    /// Every table; `months` first because the others reference it.
    pub const ALL: [Table; 7] = [
        Table::Months,
        Table::Spending,
        Table::Budget,
        Table::Accounts,
        Table::Income,
        Table::InvestmentsVariable,
        Table::InvestmentsFixed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Months => "months",
            Table::Spending => "spending",
            Table::Budget => "budget",
            Table::Accounts => "accounts",
            Table::Income => "income",
            Table::InvestmentsVariable => "investments_variable",
            Table::InvestmentsFixed => "investments_fixed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Table::Months => MONTHS_COLUMNS,
            Table::Spending => SPENDING_COLUMNS,
            Table::Budget => BUDGET_COLUMNS,
            Table::Accounts => ACCOUNTS_COLUMNS,
            Table::Income => INCOME_COLUMNS,
            Table::InvestmentsVariable => INVESTMENTS_VARIABLE_COLUMNS,
            Table::InvestmentsFixed => INVESTMENTS_FIXED_COLUMNS,
        }
    }

    /// Canonical field names making up the primary key.
    pub fn primary_key(&self) -> &'static [&'static str] {
        &["id"]
    }

    /// Whether rows reference `months` through `month_id`.
    pub fn references_months(&self) -> bool {
        self.column_index("month_id").is_some()
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns().iter().position(|c| c.field == field)
    }

    /// Positions of the primary-key fields in a row.
    pub fn primary_key_indices(&self) -> Vec<usize> {
        self.primary_key()
            .iter()
            .filter_map(|f| self.column_index(f))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A canonical record that can be flattened into a ledger row.
pub trait LedgerRecord {
    const TABLE: Table;

    /// Cell values in [`Table::columns`] order.
    fn values(&self) -> Vec<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_every_table_keys_on_id() {
        for table in Table::ALL {
            assert_eq!(table.primary_key_indices(), vec![0], "{table}");
            assert_eq!(table.columns()[0].storage, "id");
        }
    }

    #[test]
    fn test_month_references() {
        assert!(!Table::Months.references_months());
        assert!(!Table::InvestmentsFixed.references_months());
        assert!(Table::Spending.references_months());
        assert!(Table::Accounts.references_months());
    }

    #[test]
    fn test_table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("spending_data"), None);
    }

    #[test]
    fn test_storage_mapping() {
        let interest = Table::InvestmentsFixed.columns()[4];
        assert_eq!(interest.field, "interest");
        assert_eq!(interest.storage, "Interest (%)");
        assert_eq!(interest.kind.sql(), "NUMERIC");
    }

    #[test]
    fn test_value_render() {
        let ts = chrono::NaiveDate::from_ymd_opt(2023, 2, 28)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Value::from(ts).render(), "2023-02-28 00:00:00");
        assert_eq!(Value::from(dec!(4.50)).render(), "4.5");
        assert_eq!(Value::from(-1951i64).render(), "-1951");
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert!(Value::Null.is_null());
    }
}
