//! Batch file loading for aggregation.
//!
//! Reads every `.json` file in a directory of persisted batches into a
//! flat collection of contract records. A batch file holds either one
//! record or an array of records, exactly as the remote returned it. A
//! file that cannot be read or parsed is logged and skipped; only a
//! missing directory fails the whole call.

use crate::models::{ContractRecord, ValueKind};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load all contract records persisted under `dir`.
///
/// Order is preserved within a file; order across files follows the
/// directory scan and is not meaningful to any aggregate.
pub fn load_contracts(dir: &Path) -> Result<Vec<ContractRecord>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read batch directory: {}", dir.display()))?;

    let mut records = Vec::new();
    let mut files_loaded = 0usize;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };

        let document: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping malformed JSON in {}: {}", path.display(), e);
                continue;
            }
        };

        match document {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(map) => records.push(ContractRecord::new(map)),
                        other => debug!(
                            "Ignoring non-record array entry ({}) in {}",
                            ValueKind::of(&other),
                            path.display()
                        ),
                    }
                }
            }
            Value::Object(map) => records.push(ContractRecord::new(map)),
            other => {
                warn!(
                    "Skipping {}: top level is {}, expected a record or an array of records",
                    path.display(),
                    ValueKind::of(&other)
                );
                continue;
            }
        }

        files_loaded += 1;
    }

    debug!("Loaded {} records from {} files", records.len(), files_loaded);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coerce_int;
    use std::fs;

    #[test]
    fn test_load_array_and_single_record() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("contracts_2019-06-01_to_2019-06-07.json"),
            r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("contracts_2019-06-08_to_2019-06-14.json"),
            r#"{"id": 4}"#,
        )
        .unwrap();

        let records = load_contracts(dir.path()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.json"), r#"[{"id": 1}]"#).unwrap();
        fs::write(dir.path().join("bad.json"), "{not json at all").unwrap();

        let records = load_contracts(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(coerce_int(records[0].get("id")), 1);
    }

    #[test]
    fn test_non_record_top_level_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scalar.json"), "42").unwrap();
        fs::write(dir.path().join("mixed.json"), r#"[{"id": 1}, 7, "x"]"#).unwrap();

        let records = load_contracts(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_other_extensions_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), r#"{"id": 1}"#).unwrap();
        fs::write(dir.path().join("data.json"), r#"{"id": 2}"#).unwrap();

        let records = load_contracts(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(coerce_int(records[0].get("id")), 2);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_contracts(&missing).is_err());
    }
}
