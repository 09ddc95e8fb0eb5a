use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tally_core::{Period, Table};

/// The kinds of monthly source input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Transactions,
    Budget,
    Accounts,
    Income,
    VariableInvestments,
    FixedInvestments,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Transactions,
        SourceKind::Budget,
        SourceKind::Accounts,
        SourceKind::Income,
        SourceKind::VariableInvestments,
        SourceKind::FixedInvestments,
    ];

    /// Ledger table the adapter for this source writes into.
    pub fn table(&self) -> Table {
        match self {
            SourceKind::Transactions => Table::Spending,
            SourceKind::Budget => Table::Budget,
            SourceKind::Accounts => Table::Accounts,
            SourceKind::Income => Table::Income,
            SourceKind::VariableInvestments => Table::InvestmentsVariable,
            SourceKind::FixedInvestments => Table::InvestmentsFixed,
        }
    }

    /// Section marker in the shared monthly inputs sheet.
    pub fn discriminator(&self) -> Option<&'static str> {
        match self {
            SourceKind::Budget => Some("BUDGET"),
            SourceKind::Accounts => Some("ACCOUNTS"),
            SourceKind::Income => Some("INCOME"),
            _ => None,
        }
    }
}

/// A bank-export row reshaped into named fields, before split expansion and
/// money normalization. Amount cells are still the raw text from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Line in the source file, for error messages.
    pub line: usize,
    /// The bank's own transaction id (not used as the ledger key).
    pub source_id: Option<String>,
    pub timestamp: NaiveDateTime,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub subcategory: String,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub local_amount: Option<String>,
    pub local_currency: Option<String>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub receipt: Option<String>,
    pub description: Option<String>,
    pub subcategory_split: Option<String>,
    pub out: Option<String>,
    pub inflow: Option<String>,
}

impl StatementRow {
    pub fn period(&self) -> Period {
        Period::from_date(self.timestamp.date())
    }

    pub fn is_split(&self) -> bool {
        self.subcategory_split.is_some()
    }
}
