//! Minor-unit (penny) normalization for every additive monetary field.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Signed amount in minor currency units.
pub type Pennies = i64;

/// Parse a human-edited decimal cell.
///
/// Blank cells and `nan` markers are missing (`None`); anything else that is
/// not a decimal number is a parse error.
pub fn parse_amount(raw: Option<&str>) -> Result<Option<Decimal>> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(Some)
        .map_err(|_| Error::parse(format!("'{raw}' is not a numeric amount")))
}

/// Convert a decimal amount to pennies: `x * 100`, rounded half to even.
/// Missing amounts are zero.
pub fn to_pennies(amount: Option<Decimal>) -> Result<Pennies> {
    let Some(amount) = amount else {
        return Ok(0);
    };
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_i64())
        .ok_or_else(|| Error::parse(format!("amount {amount} is out of range")))
}

/// Normalize one raw cell to pennies.
pub fn normalize(raw: Option<&str>) -> Result<Pennies> {
    to_pennies(parse_amount(raw)?)
}

/// Normalize a floating amount; NaN and infinities are missing.
pub fn normalize_f64(value: Option<f64>) -> Result<Pennies> {
    match value.filter(|v| v.is_finite()) {
        None => Ok(0),
        Some(v) => {
            let d = Decimal::from_f64(v)
                .ok_or_else(|| Error::parse(format!("amount {v} is out of range")))?;
            to_pennies(Some(d))
        }
    }
}

/// Normalize a column of raw cells.
pub fn normalize_all<'a, I>(column: I) -> Result<Vec<Pennies>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    column.into_iter().map(normalize).collect()
}

/// Round to two decimal places, half to even. Used for the derived value of
/// variable investments, which stay decimal.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_strings() {
        assert_eq!(normalize(Some("-19.51")).unwrap(), -1951);
        assert_eq!(normalize(Some("5")).unwrap(), 500);
        assert_eq!(normalize(Some(" 12.5 ")).unwrap(), 1250);
        assert_eq!(normalize(Some("+3.10")).unwrap(), 310);
    }

    #[test]
    fn test_missing_is_zero() {
        assert_eq!(normalize(None).unwrap(), 0);
        assert_eq!(normalize(Some("")).unwrap(), 0);
        assert_eq!(normalize(Some("   ")).unwrap(), 0);
        assert_eq!(normalize(Some("NaN")).unwrap(), 0);
        assert_eq!(normalize_f64(None).unwrap(), 0);
        assert_eq!(normalize_f64(Some(f64::NAN)).unwrap(), 0);
    }

    #[test]
    fn test_non_numeric_is_parse_error() {
        let err = normalize(Some("twelve")).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("twelve"));
    }

    #[test]
    fn test_half_to_even_at_the_penny() {
        assert_eq!(normalize(Some("0.125")).unwrap(), 12);
        assert_eq!(normalize(Some("0.135")).unwrap(), 14);
        assert_eq!(normalize(Some("-0.125")).unwrap(), -12);
        assert_eq!(normalize(Some("1.005")).unwrap(), 100);
    }

    #[test]
    fn test_normalize_f64() {
        assert_eq!(normalize_f64(Some(-19.51)).unwrap(), -1951);
        assert_eq!(normalize_f64(Some(0.1 + 0.2)).unwrap(), 30);
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let col = [Some("-19.51"), None, Some("5")];
        assert_eq!(normalize_all(col).unwrap(), vec![-1951, 0, 500]);
        assert!(normalize_all([Some("1"), Some("x")]).is_err());
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(12.345)), dec!(12.34));
        assert_eq!(round_cents(dec!(12.355)), dec!(12.36));
        assert_eq!(round_cents(dec!(3.1)), dec!(3.1));
    }

    proptest! {
        #[test]
        fn prop_pennies_match_two_place_rounding(units in -10_000_000i64..10_000_000, scale in 0u32..6) {
            let x = Decimal::new(units, scale);
            let pennies = normalize(Some(&x.to_string())).unwrap();
            prop_assert_eq!(Decimal::new(pennies, 2), round_cents(x));
        }
    }
}
