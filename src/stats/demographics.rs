use serde::Serialize;

use super::{percentage, ratio};
use crate::{storage::WardDemographic, types::WardNumber};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardShare {
    pub ward: WardNumber,
    pub population: u64,
    pub households: u64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalitySummary {
    pub total_population: u64,
    pub male: u64,
    pub female: u64,
    pub other: u64,
    pub households: u64,
    pub area_sq_km: f64,
    pub male_percentage: f64,
    pub female_percentage: f64,
    pub other_percentage: f64,
    /// Males per 100 females.
    pub sex_ratio: Option<f64>,
    pub average_household_size: Option<f64>,
    /// Persons per square kilometre.
    pub population_density: Option<f64>,
    pub most_populous_ward: Option<WardShare>,
    pub least_populous_ward: Option<WardShare>,
    pub wards: Vec<WardShare>,
}

pub fn municipality_summary(rows: &[WardDemographic]) -> MunicipalitySummary {
    let mut rows: Vec<&WardDemographic> = rows.iter().collect();
    rows.sort_by_key(|r| r.ward);

    let total_population = rows
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.total_population));
    let male = rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.male));
    let female = rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.female));
    let other = rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.other));
    let households = rows
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.households));
    let area_sq_km: f64 = rows.iter().map(|r| r.area_sq_km).sum();

    let wards: Vec<WardShare> = rows
        .iter()
        .map(|r| WardShare {
            ward: r.ward,
            population: r.total_population,
            households: r.households,
            percentage: percentage(r.total_population, total_population),
        })
        .collect();

    // Ties go to the lowest ward number.
    let most_populous_ward = wards
        .iter()
        .max_by(|a, b| {
            a.population
                .cmp(&b.population)
                .then_with(|| b.ward.cmp(&a.ward))
        })
        .cloned();
    let least_populous_ward = wards
        .iter()
        .min_by(|a, b| {
            a.population
                .cmp(&b.population)
                .then_with(|| a.ward.cmp(&b.ward))
        })
        .cloned();

    MunicipalitySummary {
        total_population,
        male,
        female,
        other,
        households,
        area_sq_km: super::round2(area_sq_km),
        male_percentage: percentage(male, total_population),
        female_percentage: percentage(female, total_population),
        other_percentage: percentage(other, total_population),
        sex_ratio: ratio(male as f64, female as f64, 100.0),
        average_household_size: ratio(total_population as f64, households as f64, 1.0),
        population_density: ratio(total_population as f64, area_sq_km, 1.0),
        most_populous_ward,
        least_populous_ward,
        wards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ward: u8, total: u64, male: u64, female: u64, households: u64) -> WardDemographic {
        WardDemographic {
            ward: WardNumber::new(ward).unwrap(),
            total_population: total,
            male,
            female,
            other: total - male - female,
            households,
            area_sq_km: 10.0,
        }
    }

    #[test]
    fn empty_input_yields_zeroes_and_no_ratios() {
        let summary = municipality_summary(&[]);
        assert_eq!(summary.total_population, 0);
        assert_eq!(summary.sex_ratio, None);
        assert_eq!(summary.average_household_size, None);
        assert_eq!(summary.population_density, None);
        assert_eq!(summary.most_populous_ward, None);
        assert!(summary.wards.is_empty());
    }

    #[test]
    fn totals_ratios_and_shares() {
        let rows = vec![
            row(2, 3000, 1450, 1550, 600),
            row(1, 1000, 480, 500, 250),
        ];
        let summary = municipality_summary(&rows);

        assert_eq!(summary.total_population, 4000);
        assert_eq!(summary.male, 1930);
        assert_eq!(summary.female, 2050);
        assert_eq!(summary.other, 20);
        assert_eq!(summary.households, 850);
        assert_eq!(summary.area_sq_km, 20.0);
        assert_eq!(summary.sex_ratio, Some(94.15));
        assert_eq!(summary.average_household_size, Some(4.71));
        assert_eq!(summary.population_density, Some(200.0));
        assert_eq!(summary.male_percentage, 48.25);
        assert_eq!(summary.other_percentage, 0.5);

        assert_eq!(summary.wards[0].ward.get(), 1);
        assert_eq!(summary.wards[0].percentage, 25.0);
        assert_eq!(summary.wards[1].percentage, 75.0);
        assert_eq!(summary.most_populous_ward.unwrap().ward.get(), 2);
        assert_eq!(summary.least_populous_ward.unwrap().ward.get(), 1);
    }

    #[test]
    fn ties_resolve_to_lowest_ward() {
        let rows = vec![
            row(3, 500, 250, 250, 100),
            row(1, 500, 250, 250, 100),
            row(2, 500, 250, 250, 100),
        ];
        let summary = municipality_summary(&rows);
        assert_eq!(summary.most_populous_ward.unwrap().ward.get(), 1);
        assert_eq!(summary.least_populous_ward.unwrap().ward.get(), 1);
    }
}
