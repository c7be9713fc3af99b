//! Console report output.

pub mod generator;

pub use generator::{
    render_categories, render_field_profile, render_pricing, render_vehicle_summary,
};
