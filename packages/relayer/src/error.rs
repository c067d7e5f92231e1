//! Error types for the relayer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

use crate::ledger::LedgerError;

/// Relayer error type. Each variant carries a human-readable detail string
/// safe to return to callers (no credentials, no stack traces).
#[derive(Debug)]
pub enum Error {
    /// Startup or configuration error.
    Config(String),
    /// Client supplied an incomplete or invalid payload. Not retryable
    /// without fixing the input.
    MalformedInput(String),
    /// The forwarder rejected the signature, domain, or nonce. Not
    /// retryable with the same signature.
    VerificationFailed(String),
    /// Well-formed and properly signed, but the target call itself would
    /// fail. The caller must change the underlying request.
    SimulationReverted(String),
    /// Transient network or node failure. The signed request was not
    /// consumed, so retrying it is safe.
    SubmissionFailed(String),
    /// Anything uncategorized. A defect to investigate, not to retry.
    Unexpected(String),
}

impl Error {
    /// Short machine-readable code for the wire contract.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::Unexpected(_) => "Unexpected",
            Error::MalformedInput(_) => "MalformedInput",
            Error::VerificationFailed(_) => "VerificationFailed",
            Error::SimulationReverted(_) => "SimulationReverted",
            Error::SubmissionFailed(_) => "SubmissionFailed",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::MalformedInput(_)
            | Error::VerificationFailed(_)
            | Error::SimulationReverted(_) => StatusCode::BAD_REQUEST,
            Error::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            Error::VerificationFailed(msg) => write!(f, "verification failed: {msg}"),
            Error::SimulationReverted(msg) => write!(f, "simulation reverted: {msg}"),
            Error::SubmissionFailed(msg) => write!(f, "submission failed: {msg}"),
            Error::Unexpected(msg) => write!(f, "unexpected error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Reverted(msg) => Error::SimulationReverted(msg),
            LedgerError::Unreachable(msg) => Error::SubmissionFailed(msg),
            LedgerError::Protocol(msg) => Error::Unexpected(msg),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "success": false,
            "error": self.kind(),
            "details": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
