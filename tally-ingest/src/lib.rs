//! tally-ingest: locate monthly source files, read them as fixed-column
//! tables, expand split transactions, and turn rows into canonical records.

pub mod adapters;
pub mod config;
pub mod locate;
pub mod split;
pub mod table;
pub mod types;

pub use adapters::{
    AccountsAdapter, BudgetAdapter, FixedInvestmentAdapter, IncomeAdapter, SourceAdapter,
    TransactionAdapter, TransactionBatch, VariableInvestmentAdapter,
};
pub use config::SourcesConfig;
pub use locate::{locate, locate_source, read_source};
pub use split::{SplitEntry, expand_splits, parse_split_annotation};
pub use table::{RawRow, RawTable};
pub use types::{SourceKind, StatementRow};
