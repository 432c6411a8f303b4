use serde_json::{json, Value};

use super::{
    input::{optional, output, required, RequiredWard, WardInput},
    ProcedureError,
};
use crate::{
    stats::municipality_summary,
    storage::{StorageRead, StorageTx, WardDemographic},
};

pub(super) fn get_all<S: StorageRead + ?Sized>(
    storage: &S,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let WardInput { ward } = optional(input)?;
    let rows = storage.list_ward_demographics(ward)?;
    output(&rows)
}

pub(super) fn summary<S: StorageRead + ?Sized>(storage: &S) -> Result<Value, ProcedureError> {
    let rows = storage.list_ward_demographics(None)?;
    output(&municipality_summary(&rows))
}

pub(super) fn upsert<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let record: WardDemographic = required(input)?;
    record.validate()?;
    tx.upsert_ward_demographic(&record)?;
    output(&record)
}

pub(super) fn delete<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let RequiredWard { ward } = required(input)?;
    if !tx.delete_ward_demographic(ward)? {
        return Err(ProcedureError::MissingRecord(format!("ward {}", ward)));
    }
    Ok(json!({ "ward": ward, "deleted": true }))
}
