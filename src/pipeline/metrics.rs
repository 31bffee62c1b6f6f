//! Presentational savings metrics.
//!
//! Every value is a fixed display formula of (confidence, field size).
//! Rounding is half-to-even to match the dashboard's numbers exactly.

use serde::Serialize;

/// Floor for the affected-area estimate (percent).
pub const MIN_AFFECTED_AREA_PCT: u32 = 5;
/// Ceiling for the affected-area estimate (percent).
pub const MAX_AFFECTED_AREA_PCT: u32 = 100;

/// Water saved per acre per unit confidence by targeted spraying (litres).
const WATER_LITERS_PER_ACRE: f64 = 120.0;
/// Pesticide saved per acre per unit confidence (kg).
const PESTICIDE_KG_PER_ACRE: f64 = 2.5;
/// Share of the field a targeted spray actually covers.
const SPRAY_TARGET_FRACTION: f64 = 0.25;

/// `clamp(round((1.1 - c) * 100), 5, 100)`
///
/// For c in [0, 1] the result stays within [10, 100]; the 5 % floor only
/// applies to out-of-range scores above 1.05.
pub fn affected_area_pct(confidence: f32) -> u32 {
    let raw = ((1.1 - confidence as f64) * 100.0).round_ties_even();
    let clamped = raw.clamp(MIN_AFFECTED_AREA_PCT as f64, MAX_AFFECTED_AREA_PCT as f64);
    clamped as u32
}

/// `100 - affected_area_pct(c)`
pub fn resource_saved_pct(confidence: f32) -> u32 {
    100 - affected_area_pct(confidence)
}

/// `round(c * 100, 1)`
pub fn yield_protected_pct(confidence: f32) -> f64 {
    round_to(confidence as f64 * 100.0, 1)
}

/// Litres of water saved by spraying only infected clusters.
pub fn water_saved_liters(confidence: f32, field_size_acres: f64) -> f64 {
    field_size_acres * WATER_LITERS_PER_ACRE * confidence as f64
}

/// Kilograms of pesticide saved by spraying only infected clusters.
pub fn pesticide_saved_kg(confidence: f32, field_size_acres: f64) -> f64 {
    field_size_acres * PESTICIDE_KG_PER_ACRE * confidence as f64
}

/// Acres a targeted spray needs to cover.
pub fn acres_targeted(field_size_acres: f64) -> f64 {
    field_size_acres * SPRAY_TARGET_FRACTION
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Per-diagnosis numbers shown next to the treatment plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsReport {
    pub affected_area_pct: u32,
    pub resource_saved_pct: u32,
    pub yield_protected_pct: f64,
    pub water_saved_liters: f64,
    pub pesticide_saved_kg: f64,
    pub acres_targeted: f64,
}

impl SavingsReport {
    pub fn derive(confidence: f32, field_size_acres: f64) -> Self {
        Self {
            affected_area_pct: affected_area_pct(confidence),
            resource_saved_pct: resource_saved_pct(confidence),
            yield_protected_pct: yield_protected_pct(confidence),
            water_saved_liters: water_saved_liters(confidence, field_size_acres),
            pesticide_saved_kg: pesticide_saved_kg(confidence, field_size_acres),
            acres_targeted: acres_targeted(field_size_acres),
        }
    }
}

/// Field-level impact row (depends on field size only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub water_liters: f64,
    pub pesticide_kg: f64,
    pub potential_yield_pct: f64,
}

impl ImpactSummary {
    pub fn for_field(field_size_acres: f64) -> Self {
        Self {
            water_liters: field_size_acres * 450.0,
            pesticide_kg: field_size_acres * 1.2,
            potential_yield_pct: 15.0 + field_size_acres * 0.5,
        }
    }
}

/// One bar group in the traditional-vs-targeted comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub traditional: f64,
    pub targeted: f64,
}

/// Chemicals / Water / Labor usage relative to blanket spraying (= 100).
pub fn resource_comparison(confidence: f32) -> Vec<ComparisonRow> {
    let c = confidence as f64;
    vec![
        ComparisonRow {
            metric: "Chemicals",
            traditional: 100.0,
            targeted: 100.0 - c * 40.0,
        },
        ComparisonRow {
            metric: "Water",
            traditional: 100.0,
            targeted: 100.0 - c * 30.0,
        },
        ComparisonRow {
            metric: "Labor",
            traditional: 100.0,
            targeted: 80.0,
        },
    ]
}
