//! Per-field structure profiling.
//!
//! Profiles a bounded prefix of the record collection: which top-level
//! fields occur, how often, with which runtime value shapes, and a few
//! example values. Used to spot schema drift in the remote system before
//! it silently skews the other reports.

use crate::models::{ContractRecord, ValueKind};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Cap on stored example values per field.
pub const MAX_EXAMPLES: usize = 3;

/// Observations for one top-level field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStats {
    /// Number of sampled records carrying the field.
    pub count: usize,
    /// Distinct runtime shapes observed for the field's value.
    pub kinds: BTreeSet<ValueKind>,
    /// Up to [`MAX_EXAMPLES`] distinct stringified non-null values,
    /// in first-seen order.
    pub examples: Vec<String>,
}

/// Field-level profile of the record collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldProfile {
    /// Total records in the collection.
    pub records_total: usize,
    /// Records actually profiled (the bounded prefix).
    pub records_sampled: usize,
    pub fields: BTreeMap<String, FieldStats>,
}

/// Profile the first `sample_size` records.
///
/// A field absent from a record is simply not counted for that record.
pub fn field_profile(records: &[ContractRecord], sample_size: usize) -> FieldProfile {
    let sample = &records[..records.len().min(sample_size)];
    let mut fields: BTreeMap<String, FieldStats> = BTreeMap::new();

    for record in sample {
        for (name, value) in record.fields() {
            let stats = fields.entry(name.clone()).or_default();
            stats.count += 1;
            stats.kinds.insert(ValueKind::of(value));

            if !value.is_null() && stats.examples.len() < MAX_EXAMPLES {
                let rendered = stringify(value);
                if !stats.examples.contains(&rendered) {
                    stats.examples.push(rendered);
                }
            }
        }
    }

    FieldProfile {
        records_total: records.len(),
        records_sampled: sample.len(),
        fields,
    }
}

/// Render a value for the examples list. Strings are shown bare,
/// everything else as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
