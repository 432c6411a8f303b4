use serde::Serialize;
use serde_json::Value;

use crate::procedures::{ErrorCode, ProcedureError};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// `{"result":{"data":...}}`
#[derive(Serialize)]
pub struct TrpcSuccess {
    pub result: TrpcResult,
}

#[derive(Serialize)]
pub struct TrpcResult {
    pub data: Value,
}

/// `{"error":{"message","code","httpStatus"}}`
#[derive(Serialize)]
pub struct TrpcFailure {
    pub error: TrpcErrorBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrpcErrorBody {
    pub message: String,
    pub code: ErrorCode,
    pub http_status: u16,
}

impl From<&ProcedureError> for TrpcFailure {
    fn from(err: &ProcedureError) -> Self {
        let code = err.code();
        TrpcFailure {
            error: TrpcErrorBody {
                message: err.to_string(),
                code,
                http_status: code.http_status(),
            },
        }
    }
}
