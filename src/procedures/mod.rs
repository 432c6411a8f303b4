//! Typed query and mutation procedures called by the page layer.
//!
//! Every procedure follows the same shape: decode optional input, read or
//! write through the storage traits, shape the rows, return JSON. Mutations
//! run inside a single storage transaction and require an administrator.

mod age_gender;
mod demographics;
mod error;
mod input;
mod ward_stats;

use std::str::FromStr;

use serde_json::Value;

pub use error::{ErrorCode, ProcedureError};

use crate::storage::{Storage, StorageRead, StorageTx, User};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Query,
    Mutation,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Query => "query",
            Kind::Mutation => "mutation",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Procedure {
    DemographicsGetAll,
    DemographicsSummary,
    DemographicsUpsert,
    DemographicsDelete,
    AgeGenderGetAll,
    AgeGenderPyramid,
    AgeGenderCreate,
    AgeGenderUpdate,
    AgeGenderDelete,
    WardStatsCategories,
    WardStatsGetAll,
    WardStatsSummary,
    WardStatsCreate,
    WardStatsUpdate,
    WardStatsDelete,
}

const PROCEDURES: [(Procedure, &str, Kind); 15] = [
    (Procedure::DemographicsGetAll, "demographics.getAll", Kind::Query),
    (Procedure::DemographicsSummary, "demographics.summary", Kind::Query),
    (Procedure::DemographicsUpsert, "demographics.upsert", Kind::Mutation),
    (Procedure::DemographicsDelete, "demographics.delete", Kind::Mutation),
    (Procedure::AgeGenderGetAll, "ageGender.getAll", Kind::Query),
    (Procedure::AgeGenderPyramid, "ageGender.pyramid", Kind::Query),
    (Procedure::AgeGenderCreate, "ageGender.create", Kind::Mutation),
    (Procedure::AgeGenderUpdate, "ageGender.update", Kind::Mutation),
    (Procedure::AgeGenderDelete, "ageGender.delete", Kind::Mutation),
    (Procedure::WardStatsCategories, "wardStats.categories", Kind::Query),
    (Procedure::WardStatsGetAll, "wardStats.getAll", Kind::Query),
    (Procedure::WardStatsSummary, "wardStats.summary", Kind::Query),
    (Procedure::WardStatsCreate, "wardStats.create", Kind::Mutation),
    (Procedure::WardStatsUpdate, "wardStats.update", Kind::Mutation),
    (Procedure::WardStatsDelete, "wardStats.delete", Kind::Mutation),
];

impl Procedure {
    /// `PROCEDURES` lists the variants in declaration order.
    fn entry(self) -> (Procedure, &'static str, Kind) {
        PROCEDURES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn kind(self) -> Kind {
        self.entry().2
    }

    pub fn all() -> impl Iterator<Item = Procedure> {
        PROCEDURES.iter().map(|(p, _, _)| *p)
    }
}

impl FromStr for Procedure {
    type Err = ProcedureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PROCEDURES
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(p, _, _)| *p)
            .ok_or_else(|| ProcedureError::UnknownProcedure(s.to_string()))
    }
}

fn resolve(name: &str, kind: Kind) -> Result<Procedure, ProcedureError> {
    let procedure = Procedure::from_str(name)?;
    if procedure.kind() != kind {
        return Err(ProcedureError::MethodNotSupported(
            procedure.name(),
            procedure.kind().as_str(),
        ));
    }
    Ok(procedure)
}

fn log_failure(name: &str, err: &ProcedureError) {
    match err {
        ProcedureError::Internal(inner) => log::error!("Procedure {} failed: {:#}", name, inner),
        other => log::debug!("Procedure {} rejected: {}", name, other),
    }
}

pub fn call_query<S: StorageRead + ?Sized>(
    storage: &S,
    name: &str,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let span = tracing::info_span!("procedure", procedure = name, kind = "query");
    let _guard = span.enter();

    let result = resolve(name, Kind::Query).and_then(|procedure| match procedure {
        Procedure::DemographicsGetAll => demographics::get_all(storage, input),
        Procedure::DemographicsSummary => demographics::summary(storage),
        Procedure::AgeGenderGetAll => age_gender::get_all(storage, input),
        Procedure::AgeGenderPyramid => age_gender::pyramid(storage, input),
        Procedure::WardStatsCategories => ward_stats::categories(),
        Procedure::WardStatsGetAll => ward_stats::get_all(storage, input),
        Procedure::WardStatsSummary => ward_stats::summary(storage, input),
        mutation => Err(ProcedureError::MethodNotSupported(
            mutation.name(),
            "mutation",
        )),
    });

    if let Err(err) = &result {
        log_failure(name, err);
    }
    result
}

/// Checks that `caller` may run `procedure`.
pub fn authorize(caller: Option<&User>, procedure: Procedure) -> Result<(), ProcedureError> {
    let user = caller.ok_or(ProcedureError::Unauthorized)?;
    if !user.role.can_mutate() {
        return Err(ProcedureError::Forbidden {
            role: user.role,
            procedure: procedure.name(),
        });
    }
    Ok(())
}

/// Resolves a mutation by name and checks the caller may run it, before any
/// input is decoded.
pub fn check_mutation(caller: Option<&User>, name: &str) -> Result<Procedure, ProcedureError> {
    let result = resolve(name, Kind::Mutation).and_then(|procedure| {
        authorize(caller, procedure)?;
        Ok(procedure)
    });
    if let Err(err) = &result {
        log_failure(name, err);
    }
    result
}

pub fn call_mutation<S: Storage>(
    storage: &S,
    caller: Option<&User>,
    name: &str,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let span = tracing::info_span!("procedure", procedure = name, kind = "mutation");
    let _guard = span.enter();

    let procedure = check_mutation(caller, name)?;
    let result = storage
        .begin_tx()
        .map_err(ProcedureError::from)
        .and_then(|tx| {
            let output = run_mutation(&tx, procedure, input)?;
            tx.commit()?;
            Ok(output)
        });

    match &result {
        Ok(_) => {
            if let Some(user) = caller {
                log::info!("✏️ {} by {} ({})", procedure.name(), user.name, user.role);
            }
        }
        Err(err) => log_failure(name, err),
    }
    result
}

fn run_mutation<T: StorageTx>(
    tx: &T,
    procedure: Procedure,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    match procedure {
        Procedure::DemographicsUpsert => demographics::upsert(tx, input),
        Procedure::DemographicsDelete => demographics::delete(tx, input),
        Procedure::AgeGenderCreate => age_gender::create(tx, input),
        Procedure::AgeGenderUpdate => age_gender::update(tx, input),
        Procedure::AgeGenderDelete => age_gender::delete(tx, input),
        Procedure::WardStatsCreate => ward_stats::create(tx, input),
        Procedure::WardStatsUpdate => ward_stats::update(tx, input),
        Procedure::WardStatsDelete => ward_stats::delete(tx, input),
        query => Err(ProcedureError::MethodNotSupported(query.name(), "query")),
    }
}
