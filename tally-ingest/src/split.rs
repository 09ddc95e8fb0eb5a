//! Split-transaction expansion.
//!
//! A bank row may carry an annotation such as
//! `Alcohol:-7.00,Groceries:-12.51`, meaning one payment covers several
//! subcategories. Each annotated row is replaced by one child per entry; the
//! children always sum to the parent amount.

use rust_decimal::Decimal;
use tally_core::{Error, Result, money};

use crate::types::StatementRow;

/// One `name:value` entry of a split annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEntry {
    pub subcategory: String,
    pub amount: Decimal,
    /// Amount exactly as written, carried into the child's amount columns.
    pub raw_amount: String,
}

/// Parse a whole annotation. Any malformed entry fails the annotation.
pub fn parse_split_annotation(annotation: &str) -> Result<Vec<SplitEntry>> {
    annotation.split(',').map(parse_entry).collect()
}

fn parse_entry(entry: &str) -> Result<SplitEntry> {
    let malformed = |why: &str| Error::parse(format!("malformed split entry '{entry}': {why}"));

    let parts: Vec<&str> = entry.split(':').collect();
    let [name, value] = parts.as_slice() else {
        return Err(malformed("expected exactly name:value"));
    };
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() {
        return Err(malformed("subcategory is empty"));
    }
    let amount = money::parse_amount(Some(value))
        .map_err(|_| malformed("value is not numeric"))?
        .ok_or_else(|| malformed("value is empty"))?;

    Ok(SplitEntry {
        subcategory: name.to_string(),
        amount,
        raw_amount: value.to_string(),
    })
}

impl StatementRow {
    /// Build the child row for one split entry.
    ///
    /// The child inherits every field of the parent except subcategory, the
    /// amount columns and the annotation itself. The sign of the entry picks
    /// exactly one of In/Out; zero counts as Out.
    pub fn split_child(&self, entry: &SplitEntry) -> StatementRow {
        let (out, inflow) = if entry.amount > Decimal::ZERO {
            (None, Some(entry.raw_amount.clone()))
        } else {
            (Some(entry.raw_amount.clone()), None)
        };
        StatementRow {
            subcategory: entry.subcategory.clone(),
            amount: Some(entry.raw_amount.clone()),
            local_amount: Some(entry.raw_amount.clone()),
            subcategory_split: None,
            out,
            inflow,
            ..self.clone()
        }
    }

    /// Signed amount of the row: the Amount column, or Out + In when the
    /// Amount column is blank.
    pub fn signed_amount(&self) -> Result<Decimal> {
        if let Some(amount) = money::parse_amount(self.amount.as_deref())? {
            return Ok(amount);
        }
        let out = money::parse_amount(self.out.as_deref())?.unwrap_or_default();
        let inflow = money::parse_amount(self.inflow.as_deref())?.unwrap_or_default();
        Ok(out + inflow)
    }
}

/// Replace every annotated row by its children.
///
/// Output order: unannotated rows in file order, then the children
/// of each annotated row in encounter order, entries in annotation order.
pub fn expand_splits(rows: Vec<StatementRow>) -> Result<Vec<StatementRow>> {
    let (split, mut kept): (Vec<_>, Vec<_>) = rows.into_iter().partition(StatementRow::is_split);

    for parent in &split {
        let annotation = parent.subcategory_split.as_deref().unwrap_or_default();
        let location = format!("line {}", parent.line);
        let entries = parse_split_annotation(annotation).map_err(|e| e.at(&location))?;

        let parent_amount = parent.signed_amount().map_err(|e| e.at(&location))?;
        let parent_pennies = money::to_pennies(Some(parent_amount))?;
        let children_pennies: i64 = entries
            .iter()
            .map(|e| money::to_pennies(Some(e.amount)))
            .sum::<Result<i64>>()?;
        if parent_pennies != children_pennies {
            return Err(Error::parse(format!(
                "split '{annotation}' sums to {children_pennies} pennies but the transaction is {parent_pennies}"
            ))
            .at(&location));
        }

        kept.extend(entries.iter().map(|e| parent.split_child(e)));
    }

    Ok(kept)
}
