//! tally-ledger: append-only ledger stores, the appender, and the monthly
//! ingestion pipeline.

pub mod appender;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod sqlite;
pub mod store;

pub use appender::{AppendReport, LedgerAppender};
pub use error::{LedgerError, Result};
pub use memory::MemoryStore;
pub use pipeline::{Pipeline, RunSummary};
pub use sqlite::SqliteStore;
pub use store::{Key, LedgerStore, Row, row_key};

/// Create every ledger table, `months` first.
pub fn create_all<S: LedgerStore>(store: &mut S) -> Result<()> {
    for table in tally_core::Table::ALL {
        store.create_table(table)?;
    }
    Ok(())
}

/// Drop every ledger table, dependents before `months`.
pub fn drop_all<S: LedgerStore>(store: &mut S) -> Result<()> {
    for table in tally_core::Table::ALL.into_iter().rev() {
        store.drop_table(table)?;
    }
    Ok(())
}
