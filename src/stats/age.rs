use std::collections::BTreeMap;

use serde::Serialize;

use super::{percentage, ratio};
use crate::{
    storage::AgeGenderRow,
    types::{AgeGroup, Gender, LifeStage},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBand {
    pub age_group: String,
    pub male: u64,
    pub female: u64,
    pub other: u64,
    pub total: u64,
    pub male_percentage: f64,
    pub female_percentage: f64,
    pub other_percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgePyramid {
    pub total: u64,
    pub bands: Vec<AgeBand>,
    pub child_population: u64,
    pub working_age_population: u64,
    pub elderly_population: u64,
    /// Dependants (0-14 and 65+) per 100 people of working age.
    pub dependency_ratio: Option<f64>,
}

pub fn age_pyramid(rows: &[AgeGenderRow]) -> AgePyramid {
    let mut counts: BTreeMap<AgeGroup, [u64; 3]> = BTreeMap::new();
    for row in rows {
        let slot = match row.gender {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Other => 2,
        };
        let entry = counts.entry(row.age_group).or_default();
        entry[slot] = entry[slot].saturating_add(row.population);
    }

    let total = counts
        .values()
        .flat_map(|c| c.iter())
        .fold(0u64, |acc, c| acc.saturating_add(*c));

    let mut child_population = 0u64;
    let mut working_age_population = 0u64;
    let mut elderly_population = 0u64;

    let bands = AgeGroup::all()
        .iter()
        .map(|group| {
            let [male, female, other] = counts.get(group).copied().unwrap_or_default();
            let band_total = male.saturating_add(female).saturating_add(other);
            let stage_total = match group.life_stage() {
                LifeStage::Child => &mut child_population,
                LifeStage::WorkingAge => &mut working_age_population,
                LifeStage::Elderly => &mut elderly_population,
            };
            *stage_total = stage_total.saturating_add(band_total);
            AgeBand {
                age_group: group.label(),
                male,
                female,
                other,
                total: band_total,
                male_percentage: percentage(male, total),
                female_percentage: percentage(female, total),
                other_percentage: percentage(other, total),
            }
        })
        .collect();

    AgePyramid {
        total,
        bands,
        child_population,
        working_age_population,
        elderly_population,
        dependency_ratio: ratio(
            child_population.saturating_add(elderly_population) as f64,
            working_age_population as f64,
            100.0,
        ),
    }
}
