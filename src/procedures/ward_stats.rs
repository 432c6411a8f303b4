use serde::Serialize;
use serde_json::{json, Value};

use super::{
    input::{output, required, CategoryInput, IdInput, Update},
    ProcedureError,
};
use crate::{
    stats::category_summary,
    storage::{ward_stats_with_fallback, NewWardStat, StorageRead, StorageTx, WardStatRow},
    types::{Category, Locale},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryInfo {
    slug: &'static str,
    title_en: &'static str,
    title_ne: &'static str,
}

pub(super) fn categories() -> Result<Value, ProcedureError> {
    let infos: Vec<CategoryInfo> = Category::all()
        .iter()
        .map(|c| CategoryInfo {
            slug: c.slug(),
            title_en: c.title(Locale::En),
            title_ne: c.title(Locale::Ne),
        })
        .collect();
    output(&infos)
}

pub(super) fn get_all<S: StorageRead + ?Sized>(
    storage: &S,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let CategoryInput { category, ward } = required(input)?;
    output(&ward_stats_with_fallback(storage, category, ward)?)
}

pub(super) fn summary<S: StorageRead + ?Sized>(
    storage: &S,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let CategoryInput { category, ward } = required(input)?;
    let rows = ward_stats_with_fallback(storage, category, ward)?;
    output(&category_summary(category, &rows))
}

pub(super) fn create<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let record: NewWardStat = required(input)?;
    record.validate()?;
    let id = tx.insert_ward_stat(&record)?;
    output(&row(id, record))
}

pub(super) fn update<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let Update { id, record } = required::<Update<NewWardStat>>(input)?;
    record.validate()?;
    if !tx.update_ward_stat(id, &record)? {
        return Err(ProcedureError::MissingRecord(format!("ward statistic {}", id)));
    }
    output(&row(id, record))
}

pub(super) fn delete<T: StorageTx>(tx: &T, input: Option<Value>) -> Result<Value, ProcedureError> {
    let IdInput { id } = required(input)?;
    if !tx.delete_ward_stat(id)? {
        return Err(ProcedureError::MissingRecord(format!("ward statistic {}", id)));
    }
    Ok(json!({ "id": id, "deleted": true }))
}

fn row(id: i64, record: NewWardStat) -> WardStatRow {
    WardStatRow {
        id,
        ward: record.ward,
        category: record.category,
        label: record.label.trim().to_string(),
        count: record.count,
    }
}
