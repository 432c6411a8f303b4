use anyhow::{Context, Result};

use crate::stats::{municipality_summary, MunicipalitySummary};
use crate::storage::StorageRead;

pub fn summarize<S: StorageRead + ?Sized>(storage: &S) -> Result<MunicipalitySummary> {
    let wards = storage
        .list_ward_demographics(None)
        .context("loading ward demographics")?;
    Ok(municipality_summary(&wards))
}

pub fn run<S: StorageRead + ?Sized>(storage: &S) -> Result<()> {
    let summary = summarize(storage)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
