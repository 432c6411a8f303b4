use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::storage::{NewAgeGender, NewWardStat, Storage, StorageTx, StorageWrite, WardDemographic};

/// Dataset document accepted by `seed`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub wards: Vec<WardDemographic>,
    #[serde(default)]
    pub age_gender: Vec<NewAgeGender>,
    #[serde(default)]
    pub ward_stats: Vec<NewWardStat>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub wards: usize,
    pub age_gender: usize,
    pub ward_stats: usize,
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing dataset {}", path.display()))
}

/// Writes the whole dataset in one transaction; nothing is kept on failure.
pub fn apply<S: Storage>(storage: &S, dataset: &Dataset) -> Result<SeedReport> {
    for ward in &dataset.wards {
        ward.validate()
            .with_context(|| format!("ward {} is invalid", ward.ward))?;
    }
    for row in &dataset.age_gender {
        row.validate().with_context(|| {
            format!("{} {} row for ward {} is invalid", row.age_group, row.gender, row.ward)
        })?;
    }
    for stat in &dataset.ward_stats {
        stat.validate()
            .with_context(|| format!("{} row for ward {} is invalid", stat.category, stat.ward))?;
    }

    let tx = storage.begin_tx().context("starting seed transaction")?;
    for ward in &dataset.wards {
        tx.upsert_ward_demographic(ward)
            .with_context(|| format!("saving ward {}", ward.ward))?;
    }
    for row in &dataset.age_gender {
        tx.insert_age_gender(row).with_context(|| {
            format!("saving {} {} in ward {}", row.age_group, row.gender, row.ward)
        })?;
    }
    for stat in &dataset.ward_stats {
        tx.insert_ward_stat(stat).with_context(|| {
            format!("saving {} {:?} in ward {}", stat.category, stat.label, stat.ward)
        })?;
    }
    tx.commit().context("committing seed transaction")?;

    Ok(SeedReport {
        wards: dataset.wards.len(),
        age_gender: dataset.age_gender.len(),
        ward_stats: dataset.ward_stats.len(),
    })
}

pub fn run<S: Storage>(storage: &S, file: &Path) -> Result<()> {
    let dataset = load_dataset(file)?;
    let report = apply(storage, &dataset)?;
    log::info!(
        "🌱 Seeded {} wards, {} age-gender rows, {} ward statistics from {}",
        report.wards,
        report.age_gender,
        report.ward_stats,
        file.display()
    );
    Ok(())
}
