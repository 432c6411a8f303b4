use std::collections::BTreeMap;

use serde::Serialize;

use super::percentage;
use crate::{
    storage::WardStatRow,
    types::{Category, WardNumber},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryItem {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardBreakdown {
    pub ward: WardNumber,
    pub total: u64,
    /// Label with the largest count in the ward.
    pub dominant: Option<String>,
    pub items: Vec<CategoryItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: Category,
    pub total: u64,
    pub items: Vec<CategoryItem>,
    pub wards: Vec<WardBreakdown>,
}

/// Sorts by count descending, then label.
fn ranked(counts: BTreeMap<String, u64>, total: u64) -> Vec<CategoryItem> {
    let mut items: Vec<CategoryItem> = counts
        .into_iter()
        .map(|(label, count)| CategoryItem {
            percentage: percentage(count, total),
            label,
            count,
        })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    items
}

pub fn category_summary(category: Category, rows: &[WardStatRow]) -> CategorySummary {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    let mut per_ward: BTreeMap<WardNumber, BTreeMap<String, u64>> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.category == category) {
        let label = row.label.trim().to_string();
        let entry = totals.entry(label.clone()).or_default();
        *entry = entry.saturating_add(row.count);
        let ward_entry = per_ward.entry(row.ward).or_default().entry(label).or_default();
        *ward_entry = ward_entry.saturating_add(row.count);
    }

    let total = totals.values().fold(0u64, |acc, c| acc.saturating_add(*c));

    let wards = per_ward
        .into_iter()
        .map(|(ward, counts)| {
            let ward_total = counts.values().fold(0u64, |acc, c| acc.saturating_add(*c));
            let items = ranked(counts, ward_total);
            let dominant = items
                .first()
                .filter(|item| item.count > 0)
                .map(|item| item.label.clone());
            WardBreakdown {
                ward,
                total: ward_total,
                dominant,
                items,
            }
        })
        .collect();

    CategorySummary {
        category,
        total,
        items: ranked(totals, total),
        wards,
    }
}
