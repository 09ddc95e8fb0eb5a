//! Canonical ledger records, one struct per table.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Pennies;
use crate::period::Period;
use crate::schema::{LedgerRecord, Table, Value};

/// Period row referenced by every month-scoped table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub id: Period,
    pub date: NaiveDateTime,
}

impl MonthRecord {
    /// Period row stamped with the first day of the month.
    pub fn for_period(period: Period) -> Self {
        Self {
            id: period,
            date: period.first_day().and_time(chrono::NaiveTime::MIN),
        }
    }
}

impl LedgerRecord for MonthRecord {
    const TABLE: Table = Table::Months;

    fn values(&self) -> Vec<Value> {
        vec![self.id.key().into(), self.date.into()]
    }
}

/// One bank transaction (or one child of a split transaction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub month_id: Period,
    pub date: NaiveDateTime,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub out: Pennies,
    #[serde(rename = "in")]
    pub inflow: Pennies,
}

impl Transaction {
    /// Signed amount of the transaction.
    pub fn signed_amount(&self) -> Pennies {
        self.out + self.inflow
    }
}

impl LedgerRecord for Transaction {
    const TABLE: Table = Table::Spending;

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.month_id.key().into(),
            self.date.into(),
            self.kind.clone().into(),
            self.name.clone().into(),
            self.category.as_str().into(),
            self.subcategory.as_str().into(),
            self.address.clone().into(),
            self.description.clone().into(),
            self.out.into(),
            self.inflow.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: String,
    pub month_id: Period,
    pub date: NaiveDateTime,
    pub category: String,
    pub subcategory: String,
    pub budget: Pennies,
}

impl LedgerRecord for BudgetLine {
    const TABLE: Table = Table::Budget;

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.month_id.key().into(),
            self.date.into(),
            self.category.as_str().into(),
            self.subcategory.as_str().into(),
            self.budget.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub id: String,
    pub account: String,
    pub date: NaiveDateTime,
    pub month_id: Period,
    pub balance: Pennies,
}

impl LedgerRecord for AccountBalance {
    const TABLE: Table = Table::Accounts;

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.account.as_str().into(),
            self.date.into(),
            self.month_id.key().into(),
            self.balance.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeLine {
    pub id: String,
    pub kind: String,
    pub date: NaiveDateTime,
    pub month_id: Period,
    pub amount: Pennies,
}

impl LedgerRecord for IncomeLine {
    const TABLE: Table = Table::Income;

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.kind.as_str().into(),
            self.date.into(),
            self.month_id.key().into(),
            self.amount.into(),
        ]
    }
}

/// Month-end snapshot of a unit-priced holding. Prices stay decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInvestment {
    pub id: String,
    pub name: String,
    pub date: NaiveDateTime,
    pub month_id: Period,
    pub company: Option<String>,
    pub unit_price: Decimal,
    pub units_owned: Decimal,
    pub value: Decimal,
}

impl LedgerRecord for VariableInvestment {
    const TABLE: Table = Table::InvestmentsVariable;

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.date.into(),
            self.month_id.key().into(),
            self.company.clone().into(),
            self.unit_price.into(),
            self.units_owned.into(),
            self.value.into(),
        ]
    }
}

/// Fixed-term, fixed-rate contract. Not scoped to a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedInvestment {
    pub id: String,
    pub name: String,
    pub company: String,
    pub amount: Pennies,
    pub interest: Decimal,
    pub duration_months: i64,
    pub purchased: NaiveDateTime,
    pub matures: NaiveDateTime,
    #[serde(rename = "return")]
    pub expected_return: Pennies,
}

impl LedgerRecord for FixedInvestment {
    const TABLE: Table = Table::InvestmentsFixed;

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.company.as_str().into(),
            self.amount.into(),
            self.interest.into(),
            self.duration_months.into(),
            self.purchased.into(),
            self.matures.into(),
            self.expected_return.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn assert_matches_table<R: LedgerRecord>(record: &R) {
        assert_eq!(record.values().len(), R::TABLE.columns().len(), "{}", R::TABLE);
    }

    #[test]
    fn test_month_record_uses_first_day() {
        let m = MonthRecord::for_period(Period::parse("FEB 23").unwrap());
        assert_eq!(m.date, ts(2023, 2, 1));
        assert_eq!(m.values()[0], Value::Text("FEB 23".into()));
        assert_matches_table(&m);
    }

    #[test]
    fn test_value_rows_follow_column_order() {
        let feb = Period::parse("FEB 23").unwrap();
        let txn = Transaction {
            id: "FEB 23 0000".into(),
            month_id: feb,
            date: ts(2023, 2, 18),
            kind: Some("Card payment".into()),
            name: Some("Tesco".into()),
            category: "Food & Drink".into(),
            subcategory: "Groceries".into(),
            address: None,
            description: None,
            out: -1951,
            inflow: 0,
        };
        assert_matches_table(&txn);
        let values = txn.values();
        assert_eq!(values[1], Value::Text("FEB 23".into()));
        assert_eq!(values[7], Value::Null);
        assert_eq!(values[9], Value::Integer(-1951));
        assert_eq!(txn.signed_amount(), -1951);

        let fixed = FixedInvestment {
            id: "x".into(),
            name: "Bond".into(),
            company: "Bank".into(),
            amount: 100_000,
            interest: dec!(4.5),
            duration_months: 12,
            purchased: ts(2023, 1, 1),
            matures: ts(2024, 1, 1),
            expected_return: 4500,
        };
        assert_matches_table(&fixed);

        let var = VariableInvestment {
            id: "FEB 23 0000".into(),
            name: "Index".into(),
            date: ts(2023, 2, 28),
            month_id: feb,
            company: None,
            unit_price: dec!(1.5),
            units_owned: dec!(10),
            value: dec!(15.00),
        };
        assert_matches_table(&var);
    }

    #[test]
    fn test_transaction_serializes_in_field() {
        let txn = Transaction {
            id: "FEB 23 0001".into(),
            month_id: Period::parse("FEB 23").unwrap(),
            date: ts(2023, 2, 11),
            kind: None,
            name: None,
            category: "Entertainment".into(),
            subcategory: "Entertainment".into(),
            address: None,
            description: None,
            out: 0,
            inflow: 500,
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["in"], 500);
        assert_eq!(json["month_id"], "FEB 23");
    }
}
