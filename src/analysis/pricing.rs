//! Per-family pricing statistics.
//!
//! Each product family gets its own summary: frequency tables for its
//! categorical fields and min/mean/max of the dealer cost. Costs are
//! carried in cents throughout; only rendering divides by 100. A record
//! whose product is missing or unrecognized is excluded from every
//! family's summary.

use crate::models::{ContractRecord, Product, ProductFamily};
use std::collections::BTreeMap;

/// Min/mean/max of dealer cost across a family, in cents.
///
/// Missing costs were coerced to 0 during extraction, so a family with
/// many incomplete products will show a 0 minimum. That matches the
/// upstream reports; see the note on `coerce_int` in `models`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostStats {
    pub min_cents: i64,
    pub max_cents: i64,
    pub mean_cents: f64,
}

impl CostStats {
    fn from_costs(costs: &[i64]) -> Option<Self> {
        if costs.is_empty() {
            return None;
        }

        let sum: i64 = costs.iter().sum();
        Some(Self {
            min_cents: costs.iter().copied().min().unwrap_or(0),
            max_cents: costs.iter().copied().max().unwrap_or(0),
            mean_cents: sum as f64 / costs.len() as f64,
        })
    }
}

/// Pricing summary for one product family.
///
/// Only the frequency tables relevant to the family are populated:
/// type/term/distance for warranty, type and term-months for GAP,
/// type for protection.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingSummary {
    pub family: ProductFamily,
    /// Records contributing to this summary.
    pub contracts: usize,
    pub type_counts: BTreeMap<String, usize>,
    pub term_counts: BTreeMap<String, usize>,
    pub distance_counts: BTreeMap<String, usize>,
    /// GAP term distribution; zero terms (missing or unparsable) are
    /// excluded from the table but still counted in `contracts`.
    pub term_month_counts: BTreeMap<i64, usize>,
    pub dealer_cost: Option<CostStats>,
    /// GAP contracts with the double-GAP flag set.
    pub double_gap_contracts: usize,
}

impl PricingSummary {
    fn new(family: ProductFamily) -> Self {
        Self {
            family,
            contracts: 0,
            type_counts: BTreeMap::new(),
            term_counts: BTreeMap::new(),
            distance_counts: BTreeMap::new(),
            term_month_counts: BTreeMap::new(),
            dealer_cost: None,
            double_gap_contracts: 0,
        }
    }
}

/// Summarize pricing for one family across all records.
pub fn pricing_summary(records: &[ContractRecord], family: ProductFamily) -> PricingSummary {
    let mut summary = PricingSummary::new(family);
    let mut costs = Vec::new();

    for record in records {
        match (family, record.product()) {
            (ProductFamily::Warranty, Product::Warranty(p)) => {
                summary.contracts += 1;
                bump(&mut summary.type_counts, p.product_type);
                bump(&mut summary.term_counts, p.term);
                bump(&mut summary.distance_counts, p.distance);
                costs.push(p.dealer_cost_cents);
            }
            (ProductFamily::Gap, Product::Gap(p)) => {
                summary.contracts += 1;
                bump(&mut summary.type_counts, p.product_type);
                if p.term_months > 0 {
                    *summary.term_month_counts.entry(p.term_months).or_default() += 1;
                }
                if p.double_gap {
                    summary.double_gap_contracts += 1;
                }
                costs.push(p.dealer_cost_cents);
            }
            (ProductFamily::Protection, Product::Protection(p)) => {
                summary.contracts += 1;
                bump(&mut summary.type_counts, p.product_type);
                costs.push(p.dealer_cost_cents);
            }
            _ => {}
        }
    }

    summary.dealer_cost = CostStats::from_costs(&costs);
    summary
}

/// Count a categorical value; absent values are omitted, not bucketed.
fn bump(counts: &mut BTreeMap<String, usize>, label: Option<String>) {
    if let Some(label) = label {
        *counts.entry(label).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format_cents;
    use serde_json::{json, Value};

    fn record(value: Value) -> ContractRecord {
        match value {
            Value::Object(map) => ContractRecord::new(map),
            _ => panic!("test record must be an object"),
        }
    }

    fn warranty(product: Value) -> ContractRecord {
        record(json!({
            "model_class": "App\\Contracts\\Warranty\\WarrantyContract",
            "product": product,
        }))
    }

    #[test]
    fn test_missing_cost_coerced_to_zero() {
        let records = vec![
            warranty(json!({"type": "Principal", "dealer_cost": 10000})),
            warranty(json!({"type": "Principal", "dealer_cost": 20000})),
            warranty(json!({"type": "Powertrain"})),
        ];

        let summary = pricing_summary(&records, ProductFamily::Warranty);
        let cost = summary.dealer_cost.unwrap();

        assert_eq!(summary.contracts, 3);
        assert_eq!(cost.min_cents, 0);
        assert_eq!(cost.max_cents, 20000);
        assert_eq!(cost.mean_cents, 10000.0);
        assert_eq!(format_cents(cost.mean_cents), "$100.00");
        assert_eq!(format_cents(cost.min_cents as f64), "$0.00");
        assert_eq!(format_cents(cost.max_cents as f64), "$200.00");
    }

    #[test]
    fn test_family_filtering() {
        let records = vec![
            warranty(json!({"dealer_cost": 100})),
            record(json!({
                "model_class": "App\\Contracts\\GAP\\GAPContract",
                "product": {"dealer_cost": 200},
            })),
            record(json!({"model_class": "Other", "product": {"dealer_cost": 300}})),
        ];

        let warranty_summary = pricing_summary(&records, ProductFamily::Warranty);
        assert_eq!(warranty_summary.contracts, 1);

        let gap_summary = pricing_summary(&records, ProductFamily::Gap);
        assert_eq!(gap_summary.contracts, 1);
        assert_eq!(gap_summary.dealer_cost.unwrap().max_cents, 200);

        let protection_summary = pricing_summary(&records, ProductFamily::Protection);
        assert_eq!(protection_summary.contracts, 0);
        assert!(protection_summary.dealer_cost.is_none());
    }

    #[test]
    fn test_gap_terms_and_double_gap() {
        let gap = |product: Value| {
            record(json!({
                "model_class": "App\\Contracts\\GAP\\GAPContract",
                "product": product,
            }))
        };
        let records = vec![
            gap(json!({"term_months": 84, "double_gap": true})),
            gap(json!({"term_months": "48"})),
            gap(json!({"term_months": "n/a", "double_gap": false})),
        ];

        let summary = pricing_summary(&records, ProductFamily::Gap);

        assert_eq!(summary.contracts, 3);
        assert_eq!(summary.double_gap_contracts, 1);
        // The unparsable term coerces to 0 and stays out of the table.
        assert_eq!(
            summary.term_month_counts,
            BTreeMap::from([(48, 1), (84, 1)])
        );
    }

    #[test]
    fn test_categorical_frequencies() {
        let records = vec![
            warranty(json!({"type": "Principal", "term": "24 month", "distance": "Unlimited km"})),
            warranty(json!({"type": "Principal", "term": "36 month"})),
            warranty(json!({"type": "Powertrain", "term": "24 month"})),
        ];

        let summary = pricing_summary(&records, ProductFamily::Warranty);

        assert_eq!(summary.type_counts["Principal"], 2);
        assert_eq!(summary.type_counts["Powertrain"], 1);
        assert_eq!(summary.term_counts["24 month"], 2);
        assert_eq!(summary.distance_counts.len(), 1);
    }
}
