//! Bank export adapter.
//!
//! Export columns, in order:
//!   id, Date, Time, Type, Name, Emoji, Subcategory, Amount, Currency,
//!   Local Amount, Local Currency, Notes, Address, Receipt, Description,
//!   Subcategory Split, Out, In

use chrono::NaiveDateTime;
use tally_core::{
    CategoryMap, Error, MonthRecord, Period, Result, Transaction, assign_sequential_ids, money,
};
use tracing::warn;

use super::SourceAdapter;
use crate::split::{expand_splits, parse_split_annotation};
use crate::table::{RawRow, RawTable};
use crate::types::{SourceKind, StatementRow};

const SUBCATEGORY: usize = 6;

/// Transactions plus every period they touch, in first-encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBatch {
    pub transactions: Vec<Transaction>,
    pub months: Vec<MonthRecord>,
}

pub struct TransactionAdapter<'a> {
    categories: &'a CategoryMap,
    datetime_format: String,
}

impl<'a> TransactionAdapter<'a> {
    pub fn new(categories: &'a CategoryMap, datetime_format: impl Into<String>) -> Self {
        Self {
            categories,
            datetime_format: datetime_format.into(),
        }
    }

    fn statement_row(&self, row: &RawRow) -> Result<StatementRow> {
        let date = row.required(1, "Date")?;
        let time = row.required(2, "Time")?;
        let stamp = format!("{date} {time}");
        let timestamp = NaiveDateTime::parse_from_str(&stamp, &self.datetime_format).map_err(|e| {
            Error::validation(format!(
                "line {}: '{stamp}' is not a timestamp in {}: {e}",
                row.line(),
                self.datetime_format
            ))
        })?;

        Ok(StatementRow {
            line: row.line(),
            source_id: row.owned(0),
            timestamp,
            kind: row.owned(3),
            name: row.owned(4),
            emoji: row.owned(5),
            subcategory: row.required(SUBCATEGORY, "Subcategory")?.to_string(),
            amount: row.owned(7),
            currency: row.owned(8),
            local_amount: row.owned(9),
            local_currency: row.owned(10),
            notes: row.owned(11),
            address: row.owned(12),
            receipt: row.owned(13),
            description: row.owned(14),
            subcategory_split: row.owned(15),
            out: row.owned(16),
            inflow: row.owned(17),
        })
    }

    /// Fail once with every subcategory the mapping lacks, split entries
    /// included.
    fn check_categories(&self, rows: &[StatementRow]) -> Result<()> {
        let mut subcategories: Vec<String> = Vec::with_capacity(rows.len());
        for row in rows {
            subcategories.push(row.subcategory.clone());
            if let Some(annotation) = row.subcategory_split.as_deref() {
                // malformed annotations are reported by the expander
                if let Ok(entries) = parse_split_annotation(annotation) {
                    subcategories.extend(entries.into_iter().map(|e| e.subcategory));
                }
            }
        }
        self.categories
            .ensure_covers(subcategories.iter().map(String::as_str))
    }
}

impl SourceAdapter for TransactionAdapter<'_> {
    type Output = TransactionBatch;

    fn kind(&self) -> SourceKind {
        SourceKind::Transactions
    }

    fn preprocess(&self, raw: &RawTable, period: Period) -> Result<TransactionBatch> {
        let rows = raw
            .rows()
            .iter()
            .map(|r| self.statement_row(r))
            .collect::<Result<Vec<_>>>()?;

        let mut months: Vec<MonthRecord> = Vec::new();
        for row in &rows {
            let touched = row.period();
            if touched != period {
                warn!(
                    line = row.line,
                    period = %touched,
                    requested = %period,
                    "transaction outside the requested period"
                );
            }
            if !months.iter().any(|m| m.id == touched) {
                months.push(MonthRecord::for_period(touched));
            }
        }

        self.check_categories(&rows)?;
        let rows = expand_splits(rows)?;
        let categories = self
            .categories
            .resolve_batch(rows.iter().map(|r| r.subcategory.as_str()))?;
        let ids = assign_sequential_ids(rows.iter().map(StatementRow::period))?;

        let transactions = rows
            .into_iter()
            .zip(categories)
            .zip(ids)
            .map(|((row, category), id)| {
                let location = |column| format!("line {}: {column}", row.line);
                let out = money::normalize(row.out.as_deref()).map_err(|e| e.at(location("Out")))?;
                let inflow =
                    money::normalize(row.inflow.as_deref()).map_err(|e| e.at(location("In")))?;
                Ok(Transaction {
                    id,
                    month_id: row.period(),
                    date: row.timestamp,
                    kind: row.kind,
                    name: row.name,
                    category,
                    subcategory: row.subcategory,
                    address: row.address,
                    description: row.description,
                    out,
                    inflow,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TransactionBatch { transactions, months })
    }
}
