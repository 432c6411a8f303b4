//! Summary statistics derived from stored counts.
//!
//! Nothing here touches storage: callers load rows and hand them in.
//! Percentages are always computed on the way out and never persisted.

mod age;
mod categories;
mod demographics;

pub use age::{age_pyramid, AgeBand, AgePyramid};
pub use categories::{category_summary, CategoryItem, CategorySummary, WardBreakdown};
pub use demographics::{municipality_summary, MunicipalitySummary, WardShare};

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`; zero when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

/// `numerator / denominator * scale`, or `None` for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64, scale: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(round2(numerator / denominator * scale))
}
