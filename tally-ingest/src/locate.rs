//! Resolve the one source file for a (kind, period) by naming convention.

use std::fs;
use std::path::{Path, PathBuf};

use tally_core::{Error, Period, Result};
use tracing::debug;

use crate::config::SourcesConfig;
use crate::table::RawTable;
use crate::types::SourceKind;

/// The single file in `dir` whose name matches `pattern`.
///
/// No match and more than one match are both validation errors.
pub fn locate(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let glob = glob::Pattern::new(pattern)
        .map_err(|e| Error::validation(format!("invalid file pattern {pattern:?}: {e}")))?;

    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if glob.matches(name) && entry.path().is_file() {
            matches.push(name.to_string());
        }
    }
    matches.sort();

    match matches.as_slice() {
        [] => Err(Error::validation(format!(
            "no files found in {} matching {pattern}",
            dir.display()
        ))),
        [one] => {
            let path = dir.join(one);
            debug!(pattern, path = %path.display(), "located source file");
            Ok(path)
        }
        many => Err(Error::validation(format!(
            "more than one file in {} matches {pattern}: {}",
            dir.display(),
            many.join(", ")
        ))),
    }
}

/// Locate the file feeding `kind` for `period`.
pub fn locate_source(config: &SourcesConfig, kind: SourceKind, period: Period) -> Result<PathBuf> {
    let (dir, pattern) = config.file_pattern(kind, period);
    locate(&dir, &pattern)
}

/// Locate and read the file feeding `kind` for `period`.
pub fn read_source(config: &SourcesConfig, kind: SourceKind, period: Period) -> Result<RawTable> {
    let path = locate_source(config, kind, period)?;
    let table = RawTable::read_path(&path, config.skip_rows, config.delimiter_byte()?)?;
    debug!(?kind, rows = table.len(), path = %path.display(), "read source file");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_single_match() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "MonzoDataExport_February_2023-03-01_101010.csv");
        touch(tmp.path(), "MonzoDataExport_January_2023-02-01_101010.csv");

        let path = locate(tmp.path(), "MonzoDataExport_February_2023*.csv").unwrap();
        assert!(path.ends_with("MonzoDataExport_February_2023-03-01_101010.csv"));
    }

    #[test]
    fn test_no_match_names_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        let err = locate(tmp.path(), "inputs_02_23*.csv").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("inputs_02_23*.csv"));
    }

    #[test]
    fn test_ambiguous_match_lists_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "inputs_02_23.csv");
        touch(tmp.path(), "inputs_02_23_v2.csv");

        let err = locate(tmp.path(), "inputs_02_23*.csv").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("more than one file"));
        assert!(msg.contains("inputs_02_23.csv, inputs_02_23_v2.csv"));
    }

    #[test]
    fn test_locate_source_uses_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SourcesConfig::with_root(tmp.path());
        fs::create_dir_all(&cfg.inputs_dir).unwrap();
        touch(&cfg.inputs_dir, "investments_fixed.csv");

        let feb = Period::parse("FEB 23").unwrap();
        let path = locate_source(&cfg, SourceKind::FixedInvestments, feb).unwrap();
        assert_eq!(path, cfg.inputs_dir.join("investments_fixed.csv"));

        let err = locate_source(&cfg, SourceKind::Transactions, feb).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_read_source_skips_header() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SourcesConfig::with_root(tmp.path());
        fs::create_dir_all(&cfg.inputs_dir).unwrap();
        fs::write(
            cfg.inputs_dir.join("inputs_02_23_final.csv"),
            "Category,Subcategory,Amount,Comment\nBUDGET,Groceries,200,\n",
        )
        .unwrap();

        let feb = Period::parse("FEB 23").unwrap();
        let table = read_source(&cfg, SourceKind::Budget, feb).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].cell(1), Some("Groceries"));
    }
}
