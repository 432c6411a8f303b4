//! Chart-ready series built from already aggregated numbers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    stats::{percentage, AgePyramid},
    storage::WardStatRow,
    types::WardNumber,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlice {
    pub label: String,
    pub value: u64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarValue {
    pub key: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarGroup {
    pub label: String,
    pub values: Vec<BarValue>,
}

/// One row of a population pyramid; male values are negative so both
/// halves can share an axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidBar {
    pub age_group: String,
    pub male: i64,
    pub female: i64,
}

/// Pie slices with zero values dropped, largest first.
pub fn pie<I, L>(items: I) -> Vec<ChartSlice>
where
    I: IntoIterator<Item = (L, u64)>,
    L: Into<String>,
{
    let items: Vec<(String, u64)> = items
        .into_iter()
        .filter(|(_, value)| *value > 0)
        .map(|(label, value)| (label.into(), value))
        .collect();
    let total = items.iter().fold(0u64, |acc, (_, v)| acc.saturating_add(*v));

    let mut slices: Vec<ChartSlice> = items
        .into_iter()
        .map(|(label, value)| ChartSlice {
            percentage: percentage(value, total),
            label,
            value,
        })
        .collect();
    slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    slices
}

/// Keeps the `keep` largest slices and folds the rest into one.
pub fn top_with_other(slices: Vec<ChartSlice>, keep: usize, other_label: &str) -> Vec<ChartSlice> {
    if slices.len() <= keep.saturating_add(1) {
        return slices;
    }
    let total = slices.iter().fold(0u64, |acc, s| acc.saturating_add(s.value));
    let mut slices = slices;
    let rest = slices.split_off(keep);
    let other = rest.iter().fold(0u64, |acc, s| acc.saturating_add(s.value));
    slices.push(ChartSlice {
        label: other_label.to_string(),
        value: other,
        percentage: percentage(other, total),
    });
    slices
}

/// One bar group per ward with a value per label, in ward order.
pub fn ward_bars<F>(rows: &[WardStatRow], ward_label: F) -> Vec<BarGroup>
where
    F: Fn(WardNumber) -> String,
{
    let mut grouped: BTreeMap<WardNumber, BTreeMap<&str, u64>> = BTreeMap::new();
    for row in rows {
        let entry = grouped
            .entry(row.ward)
            .or_default()
            .entry(row.label.trim())
            .or_default();
        *entry = entry.saturating_add(row.count);
    }
    grouped
        .into_iter()
        .map(|(ward, values)| BarGroup {
            label: ward_label(ward),
            values: values
                .into_iter()
                .map(|(key, value)| BarValue {
                    key: key.to_string(),
                    value,
                })
                .collect(),
        })
        .collect()
}

pub fn pyramid_bars(pyramid: &AgePyramid) -> Vec<PyramidBar> {
    pyramid
        .bands
        .iter()
        .map(|band| PyramidBar {
            age_group: band.age_group.clone(),
            male: -(i64::try_from(band.male).unwrap_or(i64::MAX)),
            female: i64::try_from(band.female).unwrap_or(i64::MAX),
        })
        .collect()
}
