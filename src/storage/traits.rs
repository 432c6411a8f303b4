use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AgeGroup, Category, Gender, ProfileError, Role, WardNumber};

/// Largest count the store can hold (SQLite integers are signed 64-bit).
pub const MAX_COUNT: u64 = i64::MAX as u64;

fn check_counts(counts: &[u64]) -> Result<(), ProfileError> {
    match counts.iter().find(|&&c| c > MAX_COUNT) {
        Some(&count) => Err(ProfileError::CountTooLarge(count)),
        None => Ok(()),
    }
}

/// Population and household totals for one ward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardDemographic {
    pub ward: WardNumber,
    pub total_population: u64,
    pub male: u64,
    pub female: u64,
    #[serde(default)]
    pub other: u64,
    pub households: u64,
    pub area_sq_km: f64,
}

impl WardDemographic {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !self.area_sq_km.is_finite() || self.area_sq_km < 0.0 {
            return Err(ProfileError::InvalidArea(self.area_sq_km));
        }
        check_counts(&[
            self.total_population,
            self.male,
            self.female,
            self.other,
            self.households,
        ])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGenderRow {
    pub id: i64,
    pub ward: WardNumber,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub population: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgeGender {
    pub ward: WardNumber,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub population: u64,
}

impl NewAgeGender {
    pub fn validate(&self) -> Result<(), ProfileError> {
        check_counts(&[self.population])
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGenderFilter {
    pub ward: Option<WardNumber>,
    pub gender: Option<Gender>,
}

/// One categorical count (e.g. households with a tin roof) in one ward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardStatRow {
    pub id: i64,
    pub ward: WardNumber,
    pub category: Category,
    pub label: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWardStat {
    pub ward: WardNumber,
    pub category: Category,
    pub label: String,
    pub count: u64,
}

impl NewWardStat {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.label.trim().is_empty() {
            return Err(ProfileError::EmptyLabel);
        }
        check_counts(&[self.count])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub role: Role,
}

/// Raised when a write collides with a uniqueness constraint.
#[derive(Debug, Error)]
#[error("record conflicts with an existing row: {0}")]
pub struct Conflict(pub String);

pub trait StorageRead {
    fn list_ward_demographics(&self, ward: Option<WardNumber>) -> Result<Vec<WardDemographic>>;
    fn list_age_gender(&self, filter: &AgeGenderFilter) -> Result<Vec<AgeGenderRow>>;
    fn list_ward_stats(
        &self,
        category: Category,
        ward: Option<WardNumber>,
    ) -> Result<Vec<WardStatRow>>;
    fn list_legacy_ward_stats(
        &self,
        category: Category,
        ward: Option<WardNumber>,
    ) -> Result<Vec<WardStatRow>>;
    fn load_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>>;
}

/// Update and delete operations return `false` when no row matched.
pub trait StorageWrite {
    fn upsert_ward_demographic(&self, record: &WardDemographic) -> Result<()>;
    fn delete_ward_demographic(&self, ward: WardNumber) -> Result<bool>;
    fn insert_age_gender(&self, record: &NewAgeGender) -> Result<i64>;
    fn update_age_gender(&self, id: i64, record: &NewAgeGender) -> Result<bool>;
    fn delete_age_gender(&self, id: i64) -> Result<bool>;
    fn insert_ward_stat(&self, record: &NewWardStat) -> Result<i64>;
    fn update_ward_stat(&self, id: i64, record: &NewWardStat) -> Result<bool>;
    fn delete_ward_stat(&self, id: i64) -> Result<bool>;
    fn save_user(&self, token_hash: &str, user: &User) -> Result<()>;
}

pub trait StorageTx: StorageRead + StorageWrite {
    fn commit(self) -> Result<()>;
}

pub trait Storage: StorageRead {
    type Tx: StorageTx;

    fn begin_tx(&self) -> Result<Self::Tx>;
}
