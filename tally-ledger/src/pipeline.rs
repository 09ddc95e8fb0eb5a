//! One month's ingestion, source by source.
//!
//! Tables are processed in dependency order: `months`, `spending`, `budget`,
//! `accounts`, `income`, `investments_variable`, `investments_fixed`. Each
//! append commits on its own; a failure stops the run but leaves earlier
//! tables as written.

use tally_core::{CategoryMap, LedgerRecord, MonthRecord, Period};
use tally_ingest::{
    AccountsAdapter, BudgetAdapter, FixedInvestmentAdapter, IncomeAdapter, SourceAdapter,
    SourceKind, SourcesConfig, TransactionAdapter, VariableInvestmentAdapter, read_source,
};
use tracing::info;

use crate::appender::{AppendReport, LedgerAppender};
use crate::error::Result;
use crate::store::LedgerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Append,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub period: Period,
    /// One report per table, in processing order.
    pub reports: Vec<AppendReport>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn accepted(&self) -> usize {
        self.reports.iter().map(|r| r.accepted).sum()
    }

    /// Nothing new anywhere: the month was already ingested.
    pub fn is_noop(&self) -> bool {
        self.reports.iter().all(AppendReport::is_noop)
    }
}

pub struct Pipeline<'a, S> {
    sources: &'a SourcesConfig,
    categories: &'a CategoryMap,
    appender: LedgerAppender<S>,
}

impl<'a, S: LedgerStore> Pipeline<'a, S> {
    pub fn new(sources: &'a SourcesConfig, categories: &'a CategoryMap, store: S) -> Self {
        Self {
            sources,
            categories,
            appender: LedgerAppender::new(store),
        }
    }

    pub fn store(&self) -> &S {
        self.appender.store()
    }

    pub fn into_store(self) -> S {
        self.appender.into_store()
    }

    /// Ingest every source for `period` into the ledger.
    pub fn append_period(&mut self, period: Period) -> Result<RunSummary> {
        self.run(period, Mode::Append)
    }

    /// Run every adapter and report what an append would accept, without
    /// writing anything.
    pub fn preview(&mut self, period: Period) -> Result<RunSummary> {
        self.run(period, Mode::Preview)
    }

    fn run(&mut self, period: Period, mode: Mode) -> Result<RunSummary> {
        info!(%period, ?mode, "ingesting period");
        let mut reports = Vec::with_capacity(7);

        let raw = read_source(self.sources, SourceKind::Transactions, period)?;
        let batch = TransactionAdapter::new(self.categories, &self.sources.statement_datetime_format)
            .preprocess(&raw, period)?;

        // the requested month first, then any other month the statement touches
        let mut months = vec![MonthRecord::for_period(period)];
        months.extend(batch.months.into_iter().filter(|m| m.id != period));
        reports.push(self.write(&months, mode)?);
        reports.push(self.write(&batch.transactions, mode)?);

        let inputs = read_source(self.sources, SourceKind::Budget, period)?;
        let budget = BudgetAdapter::new(self.categories).preprocess(&inputs, period)?;
        reports.push(self.write(&budget, mode)?);
        let accounts = AccountsAdapter.preprocess(&inputs, period)?;
        reports.push(self.write(&accounts, mode)?);
        let income = IncomeAdapter.preprocess(&inputs, period)?;
        reports.push(self.write(&income, mode)?);

        let raw = read_source(self.sources, SourceKind::VariableInvestments, period)?;
        let variable = VariableInvestmentAdapter.preprocess(&raw, period)?;
        reports.push(self.write(&variable, mode)?);

        let raw = read_source(self.sources, SourceKind::FixedInvestments, period)?;
        let fixed = FixedInvestmentAdapter::new(&self.sources.sheet_date_format)
            .preprocess(&raw, period)?;
        reports.push(self.write(&fixed, mode)?);

        let summary = RunSummary {
            period,
            reports,
            dry_run: mode == Mode::Preview,
        };
        info!(%period, accepted = summary.accepted(), "period done");
        Ok(summary)
    }

    fn write<R: LedgerRecord>(&mut self, records: &[R], mode: Mode) -> Result<AppendReport> {
        match mode {
            Mode::Append => self.appender.append(records),
            Mode::Preview => self.appender.preview(records),
        }
    }
}
