//! Data models for contract scraping and aggregation.
//!
//! Contract records arrive from the remote system as semi-structured JSON
//! with no validation on our side. Fields may be missing, null, or of an
//! unexpected type, so the record type here is a thin semantic wrapper
//! around the raw JSON map: every aggregate declares exactly which keys it
//! reads and which coercion it applies, instead of scattering defaults
//! through the code.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fmt;

/// Field names of the remote contract schema that this tool reads.
///
/// Centralized so schema drift shows up in one place.
pub mod field {
    pub const MODEL_CLASS: &str = "model_class";
    pub const CONTRACT_TYPE: &str = "contract_type";
    pub const PRODUCT: &str = "product";
    pub const VEHICLE: &str = "vehicle";

    // Product sub-document fields.
    pub const TYPE: &str = "type";
    pub const TERM: &str = "term";
    pub const TERM_MONTHS: &str = "term_months";
    pub const DISTANCE: &str = "distance";
    pub const DEALER_COST: &str = "dealer_cost";
    pub const CLAIM_AMOUNT: &str = "claim_amount";
    pub const MAX_MODEL_YEARS: &str = "max_model_years";
    pub const MAX_MODEL_KM: &str = "max_model_km";
    pub const DOUBLE_GAP: &str = "double_gap";

    // Vehicle sub-document fields.
    pub const MAKE: &str = "make";
    pub const MODEL: &str = "model";
    pub const YEAR: &str = "year";
    pub const VEHICLE_USAGE: &str = "vehicle_usage";
}

/// The runtime shape of a JSON value, as observed by the field profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

/// One contract record as persisted by the scraper.
///
/// A wrapper over the raw JSON object. Lookups distinguish absent from
/// null from mistyped; the `*_or_*` accessors apply the neutral defaults
/// the aggregates rely on (0, false, a caller-supplied string). Absence is
/// never treated as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRecord(Map<String, Value>);

impl ContractRecord {
    /// Wrap a raw JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// All top-level fields, in the order the document carried them.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Raw lookup: `None` means the key is absent (distinct from null).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field, or `default` when absent, null, or not a string.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        coerce_str(self.get(key)).unwrap_or(default)
    }

    /// Nested object sub-document, or `None` when absent or not an object.
    pub fn nested(&self, key: &str) -> Option<&Map<String, Value>> {
        match self.get(key) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// The `model_class` discriminator, empty when absent.
    pub fn discriminator(&self) -> &str {
        self.str_or(field::MODEL_CLASS, "")
    }

    /// The business contract type, empty when absent.
    pub fn contract_type(&self) -> &str {
        self.str_or(field::CONTRACT_TYPE, "")
    }

    /// The vehicle sub-document, if present.
    pub fn vehicle(&self) -> Option<&Map<String, Value>> {
        self.nested(field::VEHICLE)
    }

    /// The typed product carried by this record.
    ///
    /// Returns [`Product::Unrecognized`] when the discriminator matches no
    /// known family or the product sub-document is missing.
    pub fn product(&self) -> Product {
        let Some(family) = ProductFamily::from_discriminator(self.discriminator()) else {
            return Product::Unrecognized;
        };
        let Some(map) = self.nested(field::PRODUCT) else {
            return Product::Unrecognized;
        };

        match family {
            ProductFamily::Warranty => Product::Warranty(WarrantyProduct::from_map(map)),
            ProductFamily::Gap => Product::Gap(GapProduct::from_map(map)),
            ProductFamily::Protection => Product::Protection(ProtectionProduct::from_map(map)),
        }
    }
}

/// String coercion for an optional JSON value.
fn coerce_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Integer coercion for an optional JSON value. Anything non-numeric is 0.
///
/// NOTE: the remote system uses 0 both as a real value and as a missing
/// sentinel for prices and years, so 0 stays ambiguous here. Aggregates
/// that care (vehicle years) filter zeros themselves; the pricing stats
/// keep them, matching the upstream reports.
pub fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Boolean coercion: only a literal JSON `true` counts, everything else
/// (absent, null, mistyped) is false.
pub fn coerce_bool(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// Non-empty string coercion: absent, null, mistyped, and "" all map to `None`.
pub fn coerce_label(value: Option<&Value>) -> Option<&str> {
    coerce_str(value).filter(|s| !s.is_empty())
}

/// The product family a contract belongs to, per its discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductFamily {
    Warranty,
    Gap,
    Protection,
}

impl ProductFamily {
    /// All families, in report order.
    pub const ALL: [ProductFamily; 3] = [
        ProductFamily::Warranty,
        ProductFamily::Gap,
        ProductFamily::Protection,
    ];

    /// Match a `model_class` discriminator to a family.
    ///
    /// The discriminator is a fully qualified upstream class name
    /// (e.g. `App\Contracts\Warranty\WarrantyContract`), so a substring
    /// match is the stable part of it.
    pub fn from_discriminator(model_class: &str) -> Option<Self> {
        if model_class.contains("Warranty") {
            Some(ProductFamily::Warranty)
        } else if model_class.contains("GAP") {
            Some(ProductFamily::Gap)
        } else if model_class.contains("Protection") {
            Some(ProductFamily::Protection)
        } else {
            None
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductFamily::Warranty => write!(f, "Warranty"),
            ProductFamily::Gap => write!(f, "GAP"),
            ProductFamily::Protection => write!(f, "Protection"),
        }
    }
}

/// A contract's product sub-document, narrowed to its family's fields.
///
/// Closed set of variants plus a catch-all for records whose discriminator
/// we do not recognize yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Product {
    Warranty(WarrantyProduct),
    Gap(GapProduct),
    Protection(ProtectionProduct),
    Unrecognized,
}

/// Extended warranty product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WarrantyProduct {
    /// Tier name, e.g. "Principal", "Powertrain".
    pub product_type: Option<String>,
    /// Coverage term, e.g. "24 month", "No Time Limit".
    pub term: Option<String>,
    /// Distance limit, e.g. "Unlimited km", "40000 km".
    pub distance: Option<String>,
    /// Dealer cost in cents; missing coerced to 0.
    pub dealer_cost_cents: i64,
    /// Maximum claim amount in cents; missing coerced to 0.
    pub claim_amount_cents: i64,
    pub max_model_years: i64,
    pub max_model_km: i64,
}

impl WarrantyProduct {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            product_type: coerce_label(map.get(field::TYPE)).map(String::from),
            term: coerce_label(map.get(field::TERM)).map(String::from),
            distance: coerce_label(map.get(field::DISTANCE)).map(String::from),
            dealer_cost_cents: coerce_int(map.get(field::DEALER_COST)),
            claim_amount_cents: coerce_int(map.get(field::CLAIM_AMOUNT)),
            max_model_years: coerce_int(map.get(field::MAX_MODEL_YEARS)),
            max_model_km: coerce_int(map.get(field::MAX_MODEL_KM)),
        }
    }
}

/// GAP insurance product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GapProduct {
    pub product_type: Option<String>,
    /// Term in months; the remote sends this as int or numeric string,
    /// anything else becomes 0.
    pub term_months: i64,
    /// Dealer cost in cents; missing coerced to 0.
    pub dealer_cost_cents: i64,
    /// Double-GAP flag; missing coerced to false.
    pub double_gap: bool,
}

impl GapProduct {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            product_type: coerce_label(map.get(field::TYPE)).map(String::from),
            term_months: coerce_int(map.get(field::TERM_MONTHS)),
            dealer_cost_cents: coerce_int(map.get(field::DEALER_COST)),
            double_gap: coerce_bool(map.get(field::DOUBLE_GAP)),
        }
    }
}

/// Protection product fields (paint, interior, rust and similar).
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectionProduct {
    pub product_type: Option<String>,
    /// Dealer cost in cents; missing coerced to 0.
    pub dealer_cost_cents: i64,
    pub max_model_years: i64,
}

impl ProtectionProduct {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            product_type: coerce_label(map.get(field::TYPE)).map(String::from),
            dealer_cost_cents: coerce_int(map.get(field::DEALER_COST)),
            max_model_years: coerce_int(map.get(field::MAX_MODEL_YEARS)),
        }
    }
}

/// One date-bounded unit of ingestion work, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Deterministic batch file name for this window.
    pub fn file_name(&self) -> String {
        format!("contracts_{}_to_{}.json", self.start, self.end)
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Format a minor-unit (cents) amount in major currency units.
pub fn format_cents(cents: f64) -> String {
    format!("${:.2}", cents / 100.0)
}
