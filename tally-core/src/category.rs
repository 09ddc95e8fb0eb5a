//! Subcategory → category mapping.
//!
//! The mapping is a flat JSON object loaded once per process. A batch is
//! checked as a whole so that one error names every unknown subcategory.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap {
    entries: BTreeMap<String, String>,
}

impl CategoryMap {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("category mapping is not a JSON object of strings: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, subcategory: &str) -> Option<&str> {
        self.entries.get(subcategory).map(String::as_str)
    }

    /// Fail with every subcategory the mapping does not know, sorted.
    pub fn ensure_covers<'a, I>(&self, subcategories: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let missing: BTreeSet<&str> = subcategories
            .into_iter()
            .filter(|s| !self.entries.contains_key(*s))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigurationMismatch {
                missing: missing.into_iter().map(str::to_string).collect(),
            })
        }
    }

    /// Categories for a batch of subcategories, in input order.
    pub fn resolve_batch<'a, I>(&self, subcategories: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.ensure_covers(subcategories.clone())?;
        Ok(subcategories
            .into_iter()
            .filter_map(|s| self.get(s).map(str::to_string))
            .collect())
    }

    /// Category of a single subcategory already covered by [`ensure_covers`].
    ///
    /// [`ensure_covers`]: Self::ensure_covers
    pub fn lookup(&self, subcategory: &str) -> Result<String> {
        self.get(subcategory)
            .map(str::to_string)
            .ok_or_else(|| Error::ConfigurationMismatch {
                missing: vec![subcategory.to_string()],
            })
    }
}

impl FromIterator<(String, String)> for CategoryMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> CategoryMap {
        CategoryMap::from_json_str(
            r#"{"Groceries": "Food & Drink", "Alcohol": "Food & Drink", "Entertainment": "Entertainment"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_batch_in_order() {
        let cats = mapping()
            .resolve_batch(["Groceries", "Entertainment", "Groceries"])
            .unwrap();
        assert_eq!(cats, vec!["Food & Drink", "Entertainment", "Food & Drink"]);
    }

    #[test]
    fn test_missing_subcategories_reported_together() {
        let err = mapping()
            .resolve_batch(["Pets", "Groceries", "Bills", "Pets"])
            .unwrap_err();
        match err {
            Error::ConfigurationMismatch { missing } => {
                assert_eq!(missing, vec!["Bills".to_string(), "Pets".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookup_single() {
        assert_eq!(mapping().lookup("Alcohol").unwrap(), "Food & Drink");
        assert!(mapping().lookup("Unknown").is_err());
    }

    #[test]
    fn test_rejects_non_string_mapping() {
        let err = CategoryMap::from_json_str(r#"{"Groceries": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_empty_batch_is_fine() {
        let none: [&str; 0] = [];
        assert!(mapping().resolve_batch(none).unwrap().is_empty());
    }
}
