//! HTTP-facing error wrapper
//!
//! Maps domain errors to status codes and a stable `{ "error": ... }`
//! JSON body. Client-side contract breaks (unknown category, bad input)
//! become 400s; artifact and schema failures are server-side 500s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::ChurnError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg.clone() })).into_response()
    }
}

impl From<ChurnError> for AppError {
    fn from(err: ChurnError) -> Self {
        match &err {
            // The form constrains inputs to closed sets, so these signal a
            // contract break on the caller's side.
            ChurnError::InvalidInput { .. }
            | ChurnError::UnknownCategory { .. }
            | ChurnError::Config { .. }
            | ChurnError::Serialization { .. } => AppError::BadRequest(err.to_string()),
            // Mismatched or stale artifacts are a server-side fault; never
            // answer with a fallback probability.
            ChurnError::ArtifactLoad { .. }
            | ChurnError::SchemaMismatch { .. }
            | ChurnError::MergeCollision { .. }
            | ChurnError::Predict { .. }
            | ChurnError::Io { .. } => AppError::Internal(err.to_string()),
        }
    }
}
