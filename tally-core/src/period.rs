//! Calendar-month periods and their canonical `MMM YY` key.
//!
//! Every ledger table references a period by key (`FEB 23`). Sources without
//! a per-row date are stamped with the period's last day, and source files
//! are located by the period's `MM_YY` token or full month name.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const MONTHS: [(&str, &str); 12] = [
    ("JAN", "January"),
    ("FEB", "February"),
    ("MAR", "March"),
    ("APR", "April"),
    ("MAY", "May"),
    ("JUN", "June"),
    ("JUL", "July"),
    ("AUG", "August"),
    ("SEP", "September"),
    ("OCT", "October"),
    ("NOV", "November"),
    ("DEC", "December"),
];

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!("month {month} is out of range")));
        }
        Ok(Self { year, month })
    }

    /// The period a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a canonical key such as `FEB 23`.
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("'{key}' is not a valid period (expected MMM YY)"));

        let (mon, yy) = key.split_once(' ').ok_or_else(invalid)?;
        if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month = month_from_abbrev(mon).ok_or_else(invalid)?;
        let yy: i32 = yy.parse().map_err(|_| invalid())?;

        Ok(Self {
            year: expand_two_digit_year(yy),
            month,
        })
    }

    /// Build a period from loose command-line input: the first three letters
    /// of the month name (any case) and the last two digits of the year.
    pub fn from_month_and_year(month: &str, year: &str) -> Result<Self> {
        let abbrev: String = month.trim().chars().take(3).collect::<String>().to_uppercase();
        let month = month_from_abbrev(&abbrev)
            .ok_or_else(|| Error::validation(format!("\"{abbrev}\" is not a valid month")))?;

        let year = year.trim();
        let digits = year.get(year.len().saturating_sub(2)..).unwrap_or("");
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::validation(format!("\"{year}\" is not a valid year")));
        }
        let yy: i32 = digits
            .parse()
            .map_err(|_| Error::validation(format!("\"{year}\" is not a valid year")))?;

        Ok(Self {
            year: expand_two_digit_year(yy),
            month,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Canonical key, e.g. `FEB 23`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Full English month name, e.g. `February`.
    pub fn month_name(&self) -> &'static str {
        MONTHS[self.month as usize - 1].1
    }

    /// `MM_YY` token used by monthly input file names.
    pub fn file_token(&self) -> String {
        format!("{:02}_{:02}", self.month, self.year.rem_euclid(100))
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}",
            MONTHS[self.month as usize - 1].0,
            self.year.rem_euclid(100)
        )
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// `derive(date)`: the canonical key of the month a date falls in.
pub fn derive(date: NaiveDate) -> String {
    Period::from_date(date).key()
}

/// Last calendar day of the month named by `key`.
pub fn last_day_of(key: &str) -> Result<NaiveDate> {
    Ok(Period::parse(key)?.last_day())
}

/// `MM_YY` file token of the month named by `key`.
pub fn to_file_token(key: &str) -> Result<String> {
    Ok(Period::parse(key)?.file_token())
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|(a, _)| *a == abbrev)
        .map(|i| i as u32 + 1)
}

// strftime %y pivot
fn expand_two_digit_year(yy: i32) -> i32 {
    if yy >= 69 { 1900 + yy } else { 2000 + yy }
}
