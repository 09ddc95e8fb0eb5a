//! Deterministic primary keys.
//!
//! Period-scoped rows are keyed `MMM YY NNNN`, where `NNNN` is the row's
//! position in the final batch. Ids only stay stable across re-ingestion if
//! the batch order is stable, so assignment always runs after expansion.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::period::Period;

/// Largest batch that still fits the 4-digit ordinal.
pub const MAX_BATCH_ROWS: usize = 10_000;

fn sequential_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<period>[A-Z]{3} \d{2}) (?P<ordinal>\d{4})$").expect("valid id regex")
    })
}

/// Id for the row at `index` of a batch.
pub fn sequential_id(period: &Period, index: usize) -> Result<String> {
    if index >= MAX_BATCH_ROWS {
        return Err(Error::validation(format!(
            "row {index} does not fit a 4-digit id (batches are limited to {MAX_BATCH_ROWS} rows)"
        )));
    }
    Ok(format!("{period} {index:04}"))
}

/// Assign ids to a batch given each row's period, in batch order.
pub fn assign_sequential_ids<I>(periods: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = Period>,
{
    periods
        .into_iter()
        .enumerate()
        .map(|(i, p)| sequential_id(&p, i))
        .collect()
}

/// Split an existing id back into its period and ordinal.
pub fn parse_sequential_id(id: &str) -> Result<(Period, usize)> {
    let caps = sequential_id_re()
        .captures(id)
        .ok_or_else(|| Error::validation(format!("'{id}' is not a valid row id (expected MMM YY NNNN)")))?;
    let period = Period::parse(&caps["period"])?;
    let ordinal = caps["ordinal"]
        .parse()
        .map_err(|_| Error::validation(format!("'{id}' has a malformed ordinal")))?;
    Ok((period, ordinal))
}

/// Content fingerprint for rows without a per-period ordinal.
pub fn fingerprint_id<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts.into_iter().fold(String::new(), |mut acc, p| {
        acc.push_str(p.as_ref());
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feb23() -> Period {
        Period::parse("FEB 23").unwrap()
    }

    #[test]
    fn test_ids_are_zero_padded() {
        let ids = assign_sequential_ids([feb23(), feb23(), feb23()]).unwrap();
        assert_eq!(ids, vec!["FEB 23 0000", "FEB 23 0001", "FEB 23 0002"]);
    }

    #[test]
    fn test_index_counts_across_periods() {
        let jan = Period::parse("JAN 23").unwrap();
        let ids = assign_sequential_ids([jan, feb23()]).unwrap();
        assert_eq!(ids, vec!["JAN 23 0000", "FEB 23 0001"]);
    }

    #[test]
    fn test_oversized_batch_is_rejected() {
        assert!(sequential_id(&feb23(), 9_999).is_ok());
        let err = sequential_id(&feb23(), 10_000).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_parse_sequential_id() {
        let (period, ordinal) = parse_sequential_id("FEB 23 0042").unwrap();
        assert_eq!(period, feb23());
        assert_eq!(ordinal, 42);

        for bad in ["FEB 23 42", "FEB23 0001", "XYZ 23 0001", "FEB 23 0001 "] {
            assert!(parse_sequential_id(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_fingerprint_concatenates() {
        let id = fingerprint_id(["ISA", "Bank", "100000", "4.5", "12", "01/03/2024"]);
        assert_eq!(id, "ISABank1000004.51201/03/2024");
    }

    proptest! {
        #[test]
        fn prop_assignment_is_deterministic(months in proptest::collection::vec(1u32..=12, 0..200)) {
            let periods: Vec<Period> = months.iter().map(|m| Period::new(2023, *m).unwrap()).collect();
            let first = assign_sequential_ids(periods.clone()).unwrap();
            let second = assign_sequential_ids(periods).unwrap();
            prop_assert_eq!(&first, &second);
            for (i, id) in first.iter().enumerate() {
                let (_, ordinal) = parse_sequential_id(id).unwrap();
                prop_assert_eq!(ordinal, i);
            }
        }
    }
}
