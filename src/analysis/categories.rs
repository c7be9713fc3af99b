//! Category and contract-type counting.
//!
//! Counts records per discriminator (`model_class`) and per business
//! contract type, and tracks the many-to-many associations between them
//! and the product `type` values observed underneath.

use crate::models::{coerce_label, field, ContractRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Discriminator-level breakdown of the record collection.
///
/// Records missing a discriminator or contract type land in the
/// empty-string bucket rather than being dropped, so totals still add up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryReport {
    /// Records per `model_class` value.
    pub model_class_counts: BTreeMap<String, usize>,
    /// Records per `contract_type` value.
    pub contract_type_counts: BTreeMap<String, usize>,
    /// Contract types observed under each model class.
    pub class_to_types: BTreeMap<String, BTreeSet<String>>,
    /// Product `type` values observed under each contract type.
    pub type_to_products: BTreeMap<String, BTreeSet<String>>,
}

/// Count categories and their associations across all records.
pub fn category_counts(records: &[ContractRecord]) -> CategoryReport {
    let mut report = CategoryReport::default();

    for record in records {
        let model_class = record.discriminator().to_string();
        let contract_type = record.contract_type().to_string();

        *report
            .model_class_counts
            .entry(model_class.clone())
            .or_default() += 1;
        *report
            .contract_type_counts
            .entry(contract_type.clone())
            .or_default() += 1;
        report
            .class_to_types
            .entry(model_class)
            .or_default()
            .insert(contract_type.clone());

        if let Some(product) = record.nested(field::PRODUCT) {
            if let Some(product_type) = coerce_label(product.get(field::TYPE)) {
                report
                    .type_to_products
                    .entry(contract_type)
                    .or_default()
                    .insert(product_type.to_string());
            }
        }
    }

    report
}
