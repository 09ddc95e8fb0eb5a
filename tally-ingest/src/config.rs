//! Where source files live and how they are laid out.
//!
//! A `SourcesConfig` is passed explicitly to the locator and adapters; the
//! defaults describe the bank export and spreadsheet conventions the ledger
//! was built around.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_core::{Error, Period, Result};

use crate::types::SourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directory holding monthly bank exports.
    pub statements_dir: PathBuf,
    /// Directory holding the monthly inputs and investment sheets.
    pub inputs_dir: PathBuf,
    pub statement_prefix: String,
    pub inputs_prefix: String,
    pub variable_investments_prefix: String,
    pub fixed_investments_file: String,
    /// Header rows to skip at the top of every file.
    pub skip_rows: usize,
    pub delimiter: char,
    /// Combined `Date Time` format of bank export rows.
    pub statement_datetime_format: String,
    /// Date format of the fixed-investment purchase and maturity columns.
    pub sheet_date_format: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self::with_root("data")
    }
}

impl SourcesConfig {
    /// Default layout rooted at `root` (`<root>/statements`, `<root>/inputs`).
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            statements_dir: root.join("statements"),
            inputs_dir: root.join("inputs"),
            statement_prefix: "MonzoDataExport".to_string(),
            inputs_prefix: "inputs".to_string(),
            variable_investments_prefix: "investments_variable".to_string(),
            fixed_investments_file: "investments_fixed.csv".to_string(),
            skip_rows: 1,
            delimiter: ',',
            statement_datetime_format: "%d/%m/%Y %H:%M:%S".to_string(),
            sheet_date_format: "%d/%m/%Y".to_string(),
        }
    }

    /// Directory and file-name glob for a source in a period.
    pub fn file_pattern(&self, kind: SourceKind, period: Period) -> (PathBuf, String) {
        match kind {
            SourceKind::Transactions => (
                self.statements_dir.clone(),
                format!(
                    "{}_{}_{}*.csv",
                    self.statement_prefix,
                    period.month_name(),
                    period.year()
                ),
            ),
            SourceKind::Budget | SourceKind::Accounts | SourceKind::Income => (
                self.inputs_dir.clone(),
                format!("{}_{}*.csv", self.inputs_prefix, period.file_token()),
            ),
            SourceKind::VariableInvestments => (
                self.inputs_dir.clone(),
                format!(
                    "{}_{}*.csv",
                    self.variable_investments_prefix,
                    period.file_token()
                ),
            ),
            SourceKind::FixedInvestments => {
                (self.inputs_dir.clone(), self.fixed_investments_file.clone())
            }
        }
    }

    /// Field delimiter as a byte, as the csv reader wants it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(Error::validation(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )))
        }
    }
}
