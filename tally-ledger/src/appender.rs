//! Append-only writes: propose candidate rows, keep the ones whose primary
//! key the table has not seen.

use tally_core::{LedgerRecord, Table};
use tracing::{info, warn};

use crate::error::Result;
use crate::store::{LedgerStore, Row, check_shape, row_key};

/// Outcome of one append. `accepted == 0` is a no-op, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendReport {
    pub table: Table,
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl AppendReport {
    pub fn is_noop(&self) -> bool {
        self.accepted == 0
    }
}

pub struct LedgerAppender<S> {
    store: S,
}

impl<S: LedgerStore> LedgerAppender<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Append typed records to their table.
    pub fn append<R: LedgerRecord>(&mut self, records: &[R]) -> Result<AppendReport> {
        self.append_rows(R::TABLE, records.iter().map(R::values).collect())
    }

    /// Append raw rows. Existing keys, repeated keys and all-null rows are
    /// dropped; the rest are inserted in one batch.
    pub fn append_rows(&mut self, table: Table, rows: Vec<Row>) -> Result<AppendReport> {
        let (report, fresh) = self.plan(table, rows)?;
        if report.is_noop() {
            warn!(
                table = table.name(),
                candidates = report.candidates,
                "no new rows to append"
            );
            return Ok(report);
        }
        self.store.insert_rows(table, &fresh)?;
        info!(
            table = table.name(),
            accepted = report.accepted,
            rejected = report.rejected,
            "appended rows"
        );
        Ok(report)
    }

    /// What [`append_rows`](Self::append_rows) would do, without writing.
    pub fn preview_rows(&self, table: Table, rows: Vec<Row>) -> Result<AppendReport> {
        Ok(self.plan(table, rows)?.0)
    }

    pub fn preview<R: LedgerRecord>(&self, records: &[R]) -> Result<AppendReport> {
        self.preview_rows(R::TABLE, records.iter().map(R::values).collect())
    }

    fn plan(&self, table: Table, rows: Vec<Row>) -> Result<(AppendReport, Vec<Row>)> {
        let mut seen = self.store.select_existing_keys(table)?;
        let candidates = rows.len();

        let mut fresh = Vec::with_capacity(candidates);
        for row in rows {
            check_shape(table, &row)?;
            if row.iter().all(|v| v.is_null()) {
                continue;
            }
            if seen.insert(row_key(table, &row)) {
                fresh.push(row);
            }
        }

        let report = AppendReport {
            table,
            candidates,
            accepted: fresh.len(),
            rejected: candidates - fresh.len(),
        };
        Ok((report, fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::{MonthRecord, Period, Value};

    use crate::memory::MemoryStore;

    fn appender() -> LedgerAppender<MemoryStore> {
        LedgerAppender::new(MemoryStore::with_all_tables())
    }

    #[test]
    fn test_reappending_a_month_is_a_noop() {
        let mut appender = appender();
        let june = MonthRecord {
            id: Period::parse("JUN 99").unwrap(),
            date: NaiveDate::from_ymd_opt(1999, 6, 11)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };

        let first = appender.append(&[june.clone()]).unwrap();
        assert_eq!(first.accepted, 1);
        assert!(!first.is_noop());

        let second = appender.append(&[june]).unwrap();
        assert_eq!(second.accepted, 0);
        assert_eq!(second.rejected, 1);
        assert!(second.is_noop());
        assert_eq!(appender.store().row_count(Table::Months).unwrap(), 1);
    }

    #[test]
    fn test_in_batch_repeats_and_null_rows_dropped() {
        let mut appender = appender();
        let feb = MonthRecord::for_period(Period::parse("FEB 23").unwrap());
        let rows = vec![feb.values(), vec![Value::Null, Value::Null], feb.values()];

        let report = appender.append_rows(Table::Months, rows).unwrap();
        assert_eq!(
            report,
            AppendReport {
                table: Table::Months,
                candidates: 3,
                accepted: 1,
                rejected: 2,
            }
        );
    }

    #[test]
    fn test_preview_does_not_write() {
        let appender = appender();
        let feb = MonthRecord::for_period(Period::parse("FEB 23").unwrap());
        let report = appender.preview(&[feb]).unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(appender.store().row_count(Table::Months).unwrap(), 0);
    }

    #[test]
    fn test_missing_table_fails() {
        let mut appender = LedgerAppender::new(MemoryStore::new());
        let feb = MonthRecord::for_period(Period::parse("FEB 23").unwrap());
        assert_eq!(
            appender.append(&[feb]).unwrap_err().error_code(),
            "STORE_ERROR"
        );
    }
}
