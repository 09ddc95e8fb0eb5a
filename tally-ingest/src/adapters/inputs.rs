//! The monthly inputs sheet: `Category, Subcategory, Amount, Comment`.
//!
//! One sheet carries three sections told apart by the `Category` cell
//! (`BUDGET`, `ACCOUNTS`, `INCOME`). None of the rows carry a date; each is
//! stamped with the last day of the month.

use std::iter;

use tally_core::{
    AccountBalance, BudgetLine, CategoryMap, IncomeLine, Period, Result, assign_sequential_ids,
};

use super::{SourceAdapter, discriminated, month_end, pennies};
use crate::table::{RawRow, RawTable};
use crate::types::SourceKind;

const SUBCATEGORY: usize = 1;
const AMOUNT: usize = 2;

fn section(raw: &RawTable, kind: SourceKind) -> Vec<&RawRow> {
    match kind.discriminator() {
        Some(marker) => discriminated(raw, marker).collect(),
        None => Vec::new(),
    }
}

fn ids_for(period: Period, rows: usize) -> Result<Vec<String>> {
    assign_sequential_ids(iter::repeat_n(period, rows))
}

pub struct BudgetAdapter<'a> {
    categories: &'a CategoryMap,
}

impl<'a> BudgetAdapter<'a> {
    pub fn new(categories: &'a CategoryMap) -> Self {
        Self { categories }
    }
}

impl SourceAdapter for BudgetAdapter<'_> {
    type Output = Vec<BudgetLine>;

    fn kind(&self) -> SourceKind {
        SourceKind::Budget
    }

    fn preprocess(&self, raw: &RawTable, period: Period) -> Result<Vec<BudgetLine>> {
        let rows = section(raw, self.kind());
        let subcategories = rows
            .iter()
            .map(|r| r.required(SUBCATEGORY, "Subcategory"))
            .collect::<Result<Vec<_>>>()?;
        let categories = self.categories.resolve_batch(subcategories.iter().copied())?;
        let ids = ids_for(period, rows.len())?;
        let date = month_end(period);

        rows.iter()
            .zip(subcategories)
            .zip(categories)
            .zip(ids)
            .map(|(((row, subcategory), category), id)| {
                Ok(BudgetLine {
                    id,
                    month_id: period,
                    date,
                    category,
                    subcategory: subcategory.to_string(),
                    budget: pennies(row, AMOUNT, "Amount")?,
                })
            })
            .collect()
    }
}

pub struct AccountsAdapter;

impl SourceAdapter for AccountsAdapter {
    type Output = Vec<AccountBalance>;

    fn kind(&self) -> SourceKind {
        SourceKind::Accounts
    }

    fn preprocess(&self, raw: &RawTable, period: Period) -> Result<Vec<AccountBalance>> {
        let rows = section(raw, self.kind());
        let ids = ids_for(period, rows.len())?;
        let date = month_end(period);

        rows.iter()
            .zip(ids)
            .map(|(row, id)| {
                Ok(AccountBalance {
                    id,
                    account: row.required(SUBCATEGORY, "Subcategory")?.to_string(),
                    date,
                    month_id: period,
                    balance: pennies(row, AMOUNT, "Amount")?,
                })
            })
            .collect()
    }
}

pub struct IncomeAdapter;

impl SourceAdapter for IncomeAdapter {
    type Output = Vec<IncomeLine>;

    fn kind(&self) -> SourceKind {
        SourceKind::Income
    }

    fn preprocess(&self, raw: &RawTable, period: Period) -> Result<Vec<IncomeLine>> {
        let rows = section(raw, self.kind());
        let ids = ids_for(period, rows.len())?;
        let date = month_end(period);

        rows.iter()
            .zip(ids)
            .map(|(row, id)| {
                Ok(IncomeLine {
                    id,
                    kind: row.required(SUBCATEGORY, "Subcategory")?.to_string(),
                    date,
                    month_id: period,
                    amount: pennies(row, AMOUNT, "Amount")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::Error;

    const SHEET: &str = "Category,Subcategory,Amount,Comment
BUDGET,Groceries,250,
ACCOUNTS,Current,1520.336,
BUDGET,Alcohol,40.5,weekends only
INCOME,Salary,2500,
ACCOUNTS,Savings,,not opened yet
,,,
INCOME,Interest,3.125,
";

    fn sheet() -> RawTable {
        RawTable::from_reader(SHEET.as_bytes(), "inputs_02_23.csv", 1, b',').unwrap()
    }

    fn feb() -> Period {
        Period::parse("FEB 23").unwrap()
    }

    #[test]
    fn test_budget_section() {
        let cats = CategoryMap::from_json_str(
            r#"{"Groceries": "Food & Drink", "Alcohol": "Food & Drink"}"#,
        )
        .unwrap();
        let lines = BudgetAdapter::new(&cats).preprocess(&sheet(), feb()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "FEB 23 0000");
        assert_eq!(lines[0].budget, 25000);
        assert_eq!(lines[1].id, "FEB 23 0001");
        assert_eq!(lines[1].subcategory, "Alcohol");
        assert_eq!(lines[1].category, "Food & Drink");
        assert_eq!(lines[1].budget, 4050);
        let end = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        assert!(lines.iter().all(|l| l.date.date() == end));
    }

    #[test]
    fn test_budget_requires_known_subcategories() {
        let cats = CategoryMap::from_json_str(r#"{"Groceries": "Food & Drink"}"#).unwrap();
        let err = BudgetAdapter::new(&cats).preprocess(&sheet(), feb()).unwrap_err();
        assert!(matches!(err, Error::ConfigurationMismatch { ref missing } if missing == &["Alcohol"]));
    }

    #[test]
    fn test_accounts_section() {
        let balances = AccountsAdapter.preprocess(&sheet(), feb()).unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].account, "Current");
        assert_eq!(balances[0].balance, 152034);
        // blank amount is missing, not an error
        assert_eq!(balances[1].account, "Savings");
        assert_eq!(balances[1].balance, 0);
        assert_eq!(balances[1].id, "FEB 23 0001");
    }

    #[test]
    fn test_income_section_rounds_half_even() {
        let income = IncomeAdapter.preprocess(&sheet(), feb()).unwrap();
        assert_eq!(income.len(), 2);
        assert_eq!(income[0].kind, "Salary");
        assert_eq!(income[0].amount, 250000);
        assert_eq!(income[1].amount, 312);
    }

    #[test]
    fn test_non_numeric_amount_is_fatal() {
        let raw = RawTable::from_rows("t", [["INCOME", "Salary", "lots", ""]]);
        let err = IncomeAdapter.preprocess(&raw, feb()).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains("line 1: Amount"));
    }

    #[test]
    fn test_empty_section_yields_no_rows() {
        let raw = RawTable::from_rows("t", [["BUDGET", "Groceries", "10", ""]]);
        assert!(IncomeAdapter.preprocess(&raw, feb()).unwrap().is_empty());
    }
}
