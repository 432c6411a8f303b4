use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::ProcedureError;
use crate::types::{Category, WardNumber};

pub(super) fn optional<T: DeserializeOwned + Default>(
    input: Option<Value>,
) -> Result<T, ProcedureError> {
    match input {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => decode(value),
    }
}

pub(super) fn required<T: DeserializeOwned>(input: Option<Value>) -> Result<T, ProcedureError> {
    match input {
        None | Some(Value::Null) => Err(ProcedureError::BadInput("input is required".to_string())),
        Some(value) => decode(value),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ProcedureError> {
    serde_json::from_value(value).map_err(|err| ProcedureError::BadInput(err.to_string()))
}

pub(super) fn output<T: Serialize>(value: &T) -> Result<Value, ProcedureError> {
    serde_json::to_value(value).map_err(|err| ProcedureError::Internal(err.into()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WardInput {
    pub ward: Option<WardNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RequiredWard {
    pub ward: WardNumber,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IdInput {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CategoryInput {
    pub category: Category,
    #[serde(default)]
    pub ward: Option<WardNumber>,
}

/// Update payload: the row id plus the full replacement record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Update<T> {
    pub id: i64,
    #[serde(flatten)]
    pub record: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_defaults_on_missing_or_null() {
        let a: WardInput = optional(None).unwrap();
        let b: WardInput = optional(Some(Value::Null)).unwrap();
        assert!(a.ward.is_none() && b.ward.is_none());
    }

    #[test]
    fn required_rejects_missing_and_invalid() {
        assert!(matches!(
            required::<IdInput>(None),
            Err(ProcedureError::BadInput(_))
        ));
        assert!(matches!(
            required::<RequiredWard>(Some(json!({ "ward": 0 }))),
            Err(ProcedureError::BadInput(_))
        ));
    }
}
