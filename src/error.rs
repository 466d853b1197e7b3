//! Error types for table loading and callback dispatch.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Fatal errors raised while loading the launch table at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read launch table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    /// None of the accepted header names for a column were found.
    #[error("missing column {expected:?} (accepted names: {accepted})")]
    MissingColumn {
        expected: &'static str,
        accepted: String,
    },

    #[error("line {line}: invalid value {value:?} in column {column:?}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("launch table has no data rows")]
    Empty,
}

/// Errors raised while dispatching a UI update through the callback table.
#[derive(Debug, Error, PartialEq)]
pub enum CallbackError {
    #[error("no callback bound to output {0:?}")]
    UnknownOutput(String),

    #[error("missing input {0:?}")]
    MissingInput(String),

    #[error("input {input:?} is invalid: {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("payload range [{low}, {high}] is invalid")]
    InvalidRange { low: f64, high: f64 },
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
