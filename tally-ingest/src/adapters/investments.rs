//! Investment sheets.
//!
//! Variable holdings (`Name, Company, Unit Price, Units Owned`) are a monthly
//! snapshot; fixed-term contracts (`Name, Company, Amount, Interest (%),
//! Months, Purchased, Matures`) live in one standing file and are keyed by
//! their own content.

use std::iter;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tally_core::{
    Error, FixedInvestment, Period, Result, VariableInvestment, assign_sequential_ids, fingerprint_id,
    money,
};

use super::{SourceAdapter, month_end, parse_date, pennies};
use crate::table::{RawRow, RawTable};
use crate::types::SourceKind;

fn decimal(row: &RawRow, index: usize, column: &str) -> Result<Decimal> {
    let located = |e: Error| e.at(format_args!("line {}: {column}", row.line()));
    money::parse_amount(Some(row.required(index, column)?))
        .map_err(located)?
        .ok_or_else(|| located(Error::parse("value is missing")))
}

pub struct VariableInvestmentAdapter;

impl SourceAdapter for VariableInvestmentAdapter {
    type Output = Vec<VariableInvestment>;

    fn kind(&self) -> SourceKind {
        SourceKind::VariableInvestments
    }

    fn preprocess(&self, raw: &RawTable, period: Period) -> Result<Vec<VariableInvestment>> {
        let ids = assign_sequential_ids(iter::repeat_n(period, raw.len()))?;
        let date = month_end(period);

        raw.rows()
            .iter()
            .zip(ids)
            .map(|(row, id)| {
                let unit_price = decimal(row, 2, "Unit Price")?;
                let units_owned = decimal(row, 3, "Units Owned")?;
                let value = unit_price.checked_mul(units_owned).ok_or_else(|| {
                    Error::parse(format!(
                        "line {}: {unit_price} x {units_owned} is out of range",
                        row.line()
                    ))
                })?;
                Ok(VariableInvestment {
                    id,
                    name: row.required(0, "Name")?.to_string(),
                    date,
                    month_id: period,
                    company: row.owned(1),
                    unit_price,
                    units_owned,
                    value: money::round_cents(value),
                })
            })
            .collect()
    }
}

pub struct FixedInvestmentAdapter {
    date_format: String,
}

impl FixedInvestmentAdapter {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    fn contract(&self, row: &RawRow) -> Result<FixedInvestment> {
        let name = row.required(0, "Name")?.to_string();
        let company = row.required(1, "Company")?.to_string();
        let amount = pennies(row, 2, "Amount")?;
        let interest = decimal(row, 3, "Interest (%)")?;
        let duration_months = whole_months(row)?;
        let purchased = parse_date(row, 5, "Purchased", &self.date_format)?;
        let matures = parse_date(row, 6, "Matures", &self.date_format)?;

        let expected_return = expected_return(amount, interest, duration_months).ok_or_else(|| {
            Error::parse(format!("line {}: expected return is out of range", row.line()))
        })?;

        let id = fingerprint_id([
            name.clone(),
            company.clone(),
            amount.to_string(),
            interest.normalize().to_string(),
            duration_months.to_string(),
            matures.format("%d/%m/%Y").to_string(),
        ]);

        Ok(FixedInvestment {
            id,
            name,
            company,
            amount,
            interest,
            duration_months,
            purchased,
            matures,
            expected_return,
        })
    }
}

fn whole_months(row: &RawRow) -> Result<i64> {
    let months = decimal(row, 4, "Months")?;
    if !months.fract().is_zero() {
        return Err(Error::parse(format!(
            "line {}: Months: '{months}' is not a whole number of months",
            row.line()
        )));
    }
    months
        .to_i64()
        .ok_or_else(|| Error::parse(format!("line {}: Months: '{months}' is out of range", row.line())))
}

/// Simple interest over whole years of the term, truncated to pennies.
fn expected_return(amount: i64, interest: Decimal, duration_months: i64) -> Option<i64> {
    let years = Decimal::from(duration_months.div_euclid(12));
    years
        .checked_mul(Decimal::from(amount))?
        .checked_mul(interest)?
        .checked_div(Decimal::ONE_HUNDRED)?
        .trunc()
        .to_i64()
}

impl SourceAdapter for FixedInvestmentAdapter {
    type Output = Vec<FixedInvestment>;

    fn kind(&self) -> SourceKind {
        SourceKind::FixedInvestments
    }

    /// Contracts are not period-scoped; `period` is unused.
    fn preprocess(&self, raw: &RawTable, _period: Period) -> Result<Vec<FixedInvestment>> {
        raw.rows().iter().map(|r| self.contract(r)).collect()
    }
}
