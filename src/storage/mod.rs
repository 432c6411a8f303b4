pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{
    AgeGenderFilter, AgeGenderRow, Conflict, NewAgeGender, NewWardStat, Storage, StorageRead,
    StorageTx, StorageWrite, User, WardDemographic, WardStatRow,
};

use anyhow::Result;

use crate::types::{Category, WardNumber};

/// Reads ward statistics, falling back to the legacy table when the primary
/// table has nothing for the category. The source is chosen per category, so
/// a ward filter never switches tables.
pub fn ward_stats_with_fallback<S: StorageRead + ?Sized>(
    storage: &S,
    category: Category,
    ward: Option<WardNumber>,
) -> Result<Vec<WardStatRow>> {
    let rows = storage.list_ward_stats(category, None)?;
    if !rows.is_empty() {
        return Ok(match ward {
            Some(ward) => rows.into_iter().filter(|r| r.ward == ward).collect(),
            None => rows,
        });
    }
    let legacy = storage.list_legacy_ward_stats(category, ward)?;
    if !legacy.is_empty() {
        log::debug!(
            "Serving {} rows for {} from legacy_ward_statistics",
            legacy.len(),
            category
        );
    }
    Ok(legacy)
}
