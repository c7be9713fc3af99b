//! Plain-text report rendering.
//!
//! Turns the aggregate structures into the console sections the analyze
//! command prints. No machine-readable format here; the aggregates
//! themselves are the structured output.

use crate::analysis::pricing::CostStats;
use crate::analysis::{CategoryReport, FieldProfile, PricingSummary, VehicleSummary};
use crate::models::{format_cents, ProductFamily};
use std::collections::BTreeMap;

/// Frequency tables show at most this many rows.
const MAX_FREQ_ROWS: usize = 10;

fn rule() -> String {
    "-".repeat(80)
}

/// Label for the empty-string bucket of missing discriminators.
fn bucket_label(key: &str) -> &str {
    if key.is_empty() {
        "(missing)"
    } else {
        key
    }
}

/// Render a frequency table sorted by count (descending), capped at
/// [`MAX_FREQ_ROWS`] rows.
fn push_frequency_table(out: &mut String, title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }

    out.push_str(&format!("\n{}:\n", title));

    let mut rows: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    rows.sort_by_key(|(key, count)| (std::cmp::Reverse(*count), *key));

    for (key, count) in rows.into_iter().take(MAX_FREQ_ROWS) {
        out.push_str(&format!("  {}: {}\n", bucket_label(key), count));
    }
}

fn join_set<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| bucket_label(s.as_ref()).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the field profile section.
pub fn render_field_profile(profile: &FieldProfile) -> String {
    let mut out = String::new();

    out.push_str("Field Analysis\n");
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!(
        "Records loaded: {} (first {} profiled)\n",
        profile.records_total, profile.records_sampled
    ));

    for (name, stats) in &profile.fields {
        out.push_str(&format!("\nField: {}\n", name));
        out.push_str(&format!("  Occurrence: {}\n", stats.count));
        out.push_str(&format!(
            "  Value kinds: {}\n",
            join_set(stats.kinds.iter().map(|k| k.to_string()))
        ));
        if !stats.examples.is_empty() {
            out.push_str(&format!("  Examples: {}\n", stats.examples.join(", ")));
        }
    }

    out
}

/// Render the category/type counts section.
pub fn render_categories(report: &CategoryReport) -> String {
    let mut out = String::new();

    out.push_str("Contract Type Analysis\n");
    out.push_str(&rule());
    out.push('\n');

    out.push_str("\nModel Classes:\n");
    for (model_class, count) in &report.model_class_counts {
        out.push_str(&format!("\n{}:\n", bucket_label(model_class)));
        out.push_str(&format!("  Count: {}\n", count));
        if let Some(types) = report.class_to_types.get(model_class) {
            out.push_str(&format!("  Contract types: {}\n", join_set(types)));
        }
    }

    out.push_str("\nContract Types:\n");
    for (contract_type, count) in &report.contract_type_counts {
        out.push_str(&format!("\n{}:\n", bucket_label(contract_type)));
        out.push_str(&format!("  Count: {}\n", count));
        if let Some(products) = report.type_to_products.get(contract_type) {
            out.push_str(&format!("  Product types: {}\n", join_set(products)));
        }
    }

    out
}

/// Render one family's pricing section.
pub fn render_pricing(summary: &PricingSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} Product Analysis\n", summary.family));
    out.push_str(&rule());
    out.push('\n');

    if summary.contracts == 0 {
        out.push_str(&format!("No {} contracts found.\n", summary.family));
        return out;
    }

    out.push_str(&format!("Contracts: {}\n", summary.contracts));
    if summary.family == ProductFamily::Gap {
        out.push_str(&format!(
            "Double GAP contracts: {}\n",
            summary.double_gap_contracts
        ));
    }

    push_frequency_table(&mut out, "Types", &summary.type_counts);
    push_frequency_table(&mut out, "Terms", &summary.term_counts);
    push_frequency_table(&mut out, "Distance limits", &summary.distance_counts);

    if !summary.term_month_counts.is_empty() {
        // Term lengths read best in ascending order.
        out.push_str("\nTerm distribution (months):\n");
        for (months, count) in &summary.term_month_counts {
            out.push_str(&format!("  {}: {}\n", months, count));
        }
    }

    if let Some(ref cost) = summary.dealer_cost {
        out.push_str(&render_cost_stats(cost));
    }

    out
}

fn render_cost_stats(cost: &CostStats) -> String {
    let mut out = String::new();
    out.push_str("\nPricing:\n");
    out.push_str(&format!(
        "  Average dealer cost: {}\n",
        format_cents(cost.mean_cents)
    ));
    out.push_str(&format!(
        "  Min dealer cost: {}\n",
        format_cents(cost.min_cents as f64)
    ));
    out.push_str(&format!(
        "  Max dealer cost: {}\n",
        format_cents(cost.max_cents as f64)
    ));
    out
}

/// Render the vehicle summary section.
pub fn render_vehicle_summary(summary: &VehicleSummary) -> String {
    let mut out = String::new();

    out.push_str("Vehicle Analysis\n");
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!("Vehicles seen: {}\n", summary.vehicles_seen));

    let top = summary.top_makes();
    if top.is_empty() {
        return out;
    }

    out.push_str(&format!("\nTop {} makes:\n", top.len()));
    for (make, stats) in top {
        out.push_str(&format!("\n{}:\n", make));
        out.push_str(&format!("  Total contracts: {}\n", stats.total));
        out.push_str(&format!("  Unique models: {}\n", stats.models.len()));
        if let Some((min, max)) = stats.year_range() {
            out.push_str(&format!("  Year range: {}-{}\n", min, max));
        }
        if !stats.usage_types.is_empty() {
            out.push_str(&format!(
                "  Usage types: {}\n",
                join_set(&stats.usage_types)
            ));
        }
    }

    out
}
