//! tally-core: periods, money, ids, category mapping and canonical records
//! shared by the ingestion pipeline and the ledger.

pub mod category;
pub mod error;
pub mod ids;
pub mod money;
pub mod period;
pub mod records;
pub mod schema;

pub use category::CategoryMap;
pub use error::{Error, Result};
pub use ids::{assign_sequential_ids, fingerprint_id, parse_sequential_id, sequential_id};
pub use money::{Pennies, normalize, normalize_all, normalize_f64, parse_amount, round_cents, to_pennies};
pub use period::Period;
pub use records::{
    AccountBalance, BudgetLine, FixedInvestment, IncomeLine, MonthRecord, Transaction,
    VariableInvestment,
};
pub use schema::{Column, ColumnType, LedgerRecord, Table, Value};
