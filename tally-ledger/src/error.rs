use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Ingest(#[from] tally_core::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row names a period the `months` table does not hold.
    #[error("{table}: month_id '{month_id}' is not in months")]
    MissingPeriod { table: String, month_id: String },

    /// A row's width does not match its table definition.
    #[error("{table}: row has {found} values, table has {expected} columns")]
    RowShape {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("{table}: duplicate primary key ({key})")]
    DuplicateKey { table: String, key: String },

    #[error("{0}: table does not exist")]
    MissingTable(String),
}

impl LedgerError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ingest(e) => e.error_code(),
            Self::Sqlite(_) => "STORE_ERROR",
            Self::MissingPeriod { .. } | Self::DuplicateKey { .. } => "INTEGRITY_ERROR",
            Self::RowShape { .. } => "VALIDATION_ERROR",
            Self::MissingTable(_) => "STORE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through_ingest_errors() {
        let err: LedgerError = tally_core::Error::parse("bad").into();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert_eq!(err.to_string(), "parse error: bad");

        let err = LedgerError::MissingPeriod {
            table: "spending".into(),
            month_id: "FEB 23".into(),
        };
        assert_eq!(err.error_code(), "INTEGRITY_ERROR");
        assert_eq!(err.to_string(), "spending: month_id 'FEB 23' is not in months");
    }
}
