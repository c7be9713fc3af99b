//! Vehicle make/model aggregation.
//!
//! Groups records by vehicle make and tracks per-make totals, distinct
//! models, model-year spread, and usage labels. The report surfaces the
//! most common makes.

use crate::models::{coerce_int, coerce_label, field, ContractRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Per-make observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MakeStats {
    /// Records carrying a vehicle of this make.
    pub total: usize,
    pub models: BTreeSet<String>,
    /// Distinct model years; zero years (the remote's missing sentinel)
    /// are excluded.
    pub years: BTreeSet<i64>,
    pub usage_types: BTreeSet<String>,
}

impl MakeStats {
    /// Min and max model year, when any non-zero year was seen.
    pub fn year_range(&self) -> Option<(i64, i64)> {
        match (self.years.first(), self.years.last()) {
            (Some(&min), Some(&max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Vehicle breakdown of the record collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleSummary {
    /// Records that carried a vehicle sub-document at all.
    pub vehicles_seen: usize,
    pub makes: BTreeMap<String, MakeStats>,
    /// How many makes the report shows.
    pub top_n: usize,
}

impl VehicleSummary {
    /// The `top_n` makes by record count, ties broken by name.
    pub fn top_makes(&self) -> Vec<(&str, &MakeStats)> {
        let mut ranked: Vec<_> = self
            .makes
            .iter()
            .map(|(make, stats)| (make.as_str(), stats))
            .collect();
        ranked.sort_by_key(|(make, stats)| (std::cmp::Reverse(stats.total), *make));
        ranked.truncate(self.top_n);
        ranked
    }
}

/// Group all records by vehicle make.
///
/// Records without a vehicle sub-document are skipped; a vehicle without
/// a make (or model, or usage) is labelled "Unknown" rather than dropped.
pub fn vehicle_summary(records: &[ContractRecord], top_n: usize) -> VehicleSummary {
    let mut summary = VehicleSummary {
        top_n,
        ..Default::default()
    };

    for record in records {
        let Some(vehicle) = record.vehicle() else {
            continue;
        };
        summary.vehicles_seen += 1;

        let make = coerce_label(vehicle.get(field::MAKE)).unwrap_or("Unknown");
        let model = coerce_label(vehicle.get(field::MODEL)).unwrap_or("Unknown");
        let usage = coerce_label(vehicle.get(field::VEHICLE_USAGE)).unwrap_or("Unknown");

        let stats = summary.makes.entry(make.to_string()).or_default();
        stats.total += 1;
        stats.models.insert(model.to_string());
        stats.usage_types.insert(usage.to_string());

        let year = coerce_int(vehicle.get(field::YEAR));
        if year != 0 {
            stats.years.insert(year);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> ContractRecord {
        match value {
            Value::Object(map) => ContractRecord::new(map),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_grouping_and_zero_year_exclusion() {
        let records = vec![
            record(json!({"vehicle": {"make": "Honda", "model": "Civic", "year": 2020}})),
            record(json!({"vehicle": {"make": "Honda", "model": "Civic", "year": 0}})),
            record(json!({"vehicle": {"make": "Toyota", "model": "Corolla", "year": 2022}})),
        ];

        let summary = vehicle_summary(&records, 10);

        let honda = &summary.makes["Honda"];
        assert_eq!(honda.total, 2);
        assert_eq!(honda.year_range(), Some((2020, 2020)));

        let toyota = &summary.makes["Toyota"];
        assert_eq!(toyota.total, 1);
        assert_eq!(toyota.year_range(), Some((2022, 2022)));
    }

    #[test]
    fn test_unknown_make_and_missing_vehicle() {
        let records = vec![
            record(json!({"vehicle": {"model": "Mystery", "year": 2019}})),
            record(json!({"id": 1})),
        ];

        let summary = vehicle_summary(&records, 10);

        assert_eq!(summary.vehicles_seen, 1);
        assert_eq!(summary.makes["Unknown"].total, 1);
        assert!(summary.makes["Unknown"].models.contains("Mystery"));
    }

    #[test]
    fn test_top_makes_ordering_and_truncation() {
        let mut records = Vec::new();
        for _ in 0..3 {
            records.push(record(json!({"vehicle": {"make": "Ford"}})));
        }
        for _ in 0..5 {
            records.push(record(json!({"vehicle": {"make": "Honda"}})));
        }
        records.push(record(json!({"vehicle": {"make": "Audi"}})));

        let summary = vehicle_summary(&records, 2);
        let top = summary.top_makes();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "Honda");
        assert_eq!(top[1].0, "Ford");
    }

    #[test]
    fn test_distinct_sets() {
        let records = vec![
            record(json!({"vehicle": {"make": "Honda", "model": "Civic", "vehicle_usage": "personal"}})),
            record(json!({"vehicle": {"make": "Honda", "model": "Civic", "vehicle_usage": "commercial"}})),
            record(json!({"vehicle": {"make": "Honda", "model": "Accord", "vehicle_usage": "personal"}})),
        ];

        let summary = vehicle_summary(&records, 10);
        let honda = &summary.makes["Honda"];

        assert_eq!(honda.models.len(), 2);
        assert_eq!(honda.usage_types.len(), 2);
        assert_eq!(honda.year_range(), None);
    }
}
