use serde_json::{json, Value};

use super::{
    input::{optional, output, required, IdInput, Update, WardInput},
    ProcedureError,
};
use crate::{
    stats::age_pyramid,
    storage::{AgeGenderFilter, AgeGenderRow, NewAgeGender, StorageRead, StorageTx},
};

pub(super) fn get_all<S: StorageRead + ?Sized>(
    storage: &S,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let filter: AgeGenderFilter = optional(input)?;
    output(&storage.list_age_gender(&filter)?)
}

pub(super) fn pyramid<S: StorageRead + ?Sized>(
    storage: &S,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let WardInput { ward } = optional(input)?;
    let rows = storage.list_age_gender(&AgeGenderFilter { ward, gender: None })?;
    output(&age_pyramid(&rows))
}

pub(super) fn create<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let record: NewAgeGender = required(input)?;
    record.validate()?;
    let id = tx.insert_age_gender(&record)?;
    output(&row(id, record))
}

pub(super) fn update<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let Update { id, record } = required::<Update<NewAgeGender>>(input)?;
    record.validate()?;
    if !tx.update_age_gender(id, &record)? {
        return Err(ProcedureError::MissingRecord(format!("age-gender row {}", id)));
    }
    output(&row(id, record))
}

pub(super) fn delete<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let IdInput { id } = required(input)?;
    if !tx.delete_age_gender(id)? {
        return Err(ProcedureError::MissingRecord(format!("age-gender row {}", id)));
    }
    Ok(json!({ "id": id, "deleted": true }))
}

fn row(id: i64, record: NewAgeGender) -> AgeGenderRow {
    AgeGenderRow {
        id,
        ward: record.ward,
        age_group: record.age_group,
        gender: record.gender,
        population: record.population,
    }
}
