//! Source adapters: raw delimited tables in, canonical ledger records out.
//!
//! Every adapter is a pure `preprocess(raw, period)`; locating and reading the
//! file happens before, appending to the ledger after.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tally_core::{Error, Pennies, Period, Result, money};

use crate::table::{RawRow, RawTable};
use crate::types::SourceKind;

pub mod inputs;
pub mod investments;
pub mod transactions;

pub use inputs::{AccountsAdapter, BudgetAdapter, IncomeAdapter};
pub use investments::{FixedInvestmentAdapter, VariableInvestmentAdapter};
pub use transactions::{TransactionAdapter, TransactionBatch};

pub trait SourceAdapter {
    type Output;

    fn kind(&self) -> SourceKind;

    fn preprocess(&self, raw: &RawTable, period: Period) -> Result<Self::Output>;
}

/// Midnight on the last day of the period; the stamp for sheets with no
/// per-row date.
pub(crate) fn month_end(period: Period) -> NaiveDateTime {
    period.last_day().and_time(NaiveTime::MIN)
}

pub(crate) fn parse_date(row: &RawRow, index: usize, column: &str, format: &str) -> Result<NaiveDateTime> {
    let raw = row.required(index, column)?;
    NaiveDate::parse_from_str(raw, format)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| {
            Error::validation(format!(
                "line {}: '{raw}' in '{column}' is not a date in {format}: {e}",
                row.line()
            ))
        })
}

/// Rows of a shared sheet whose first column equals `marker`.
pub(crate) fn discriminated<'a>(raw: &'a RawTable, marker: &'a str) -> impl Iterator<Item = &'a RawRow> + 'a {
    raw.rows().iter().filter(move |r| r.cell(0) == Some(marker))
}

/// Normalize a money cell, naming the row and column on failure.
pub(crate) fn pennies(row: &RawRow, index: usize, column: &str) -> Result<Pennies> {
    money::normalize(row.cell(index)).map_err(|e| e.at(format_args!("line {}: {column}", row.line())))
}
