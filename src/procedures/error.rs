use serde::Serialize;
use thiserror::Error;

use crate::{storage::Conflict, types::ProfileError, types::Role};

/// Wire error codes, mirroring the JSON-RPC style codes the page layer expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotSupported,
    Conflict,
    InternalServerError,
}

impl ErrorCode {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::MethodNotSupported => 405,
            ErrorCode::Conflict => 409,
            ErrorCode::InternalServerError => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcedureError {
    #[error("no procedure named {0:?}")]
    UnknownProcedure(String),
    #[error("{0} must be called as a {1}")]
    MethodNotSupported(&'static str, &'static str),
    #[error("HTTP method {0} is not supported; use GET for queries and POST for mutations")]
    HttpMethodNotSupported(String),
    #[error("invalid input: {0}")]
    BadInput(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("role {role} may not call {procedure}")]
    Forbidden { role: Role, procedure: &'static str },
    #[error("{0} not found")]
    MissingRecord(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(anyhow::Error),
}

impl ProcedureError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProcedureError::UnknownProcedure(_) | ProcedureError::MissingRecord(_) => {
                ErrorCode::NotFound
            }
            ProcedureError::MethodNotSupported(..) | ProcedureError::HttpMethodNotSupported(_) => {
                ErrorCode::MethodNotSupported
            }
            ProcedureError::BadInput(_) => ErrorCode::BadRequest,
            ProcedureError::Unauthorized => ErrorCode::Unauthorized,
            ProcedureError::Forbidden { .. } => ErrorCode::Forbidden,
            ProcedureError::Conflict(_) => ErrorCode::Conflict,
            ProcedureError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

impl From<anyhow::Error> for ProcedureError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Conflict>() {
            Ok(conflict) => ProcedureError::Conflict(conflict.to_string()),
            Err(err) => ProcedureError::Internal(err),
        }
    }
}

impl From<ProfileError> for ProcedureError {
    fn from(err: ProfileError) -> Self {
        ProcedureError::BadInput(err.to_string())
    }
}
