//! Aggregate computations over the loaded contract collection.
//!
//! Four independent, read-only reports: field profiling, category
//! counts, per-family pricing, and vehicle breakdowns. Each is a pure
//! function of the record slice; running one twice on the same input
//! yields the same result.

pub mod categories;
pub mod pricing;
pub mod profile;
pub mod vehicles;

pub use categories::{category_counts, CategoryReport};
pub use pricing::{pricing_summary, PricingSummary};
pub use profile::{field_profile, FieldProfile};
pub use vehicles::{vehicle_summary, VehicleSummary};
