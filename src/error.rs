use actix_web::{ResponseError, http::StatusCode};
use thiserror::Error;

/// Failures surfaced by the ledger core to its callers.
///
/// Everything except [`LedgerError::EmptyLedger`] is a caller-input problem
/// and maps to a 400; an empty ledger means the genesis invariant was broken.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Missing values: {0} is required")]
    MissingField(&'static str),

    #[error("amount must be a finite, non-negative number")]
    InvalidAmount,

    #[error("Error: Please supply a valid list of nodes")]
    MissingNodes,

    #[error("invalid node address '{0}'")]
    InvalidNodeAddress(String),

    #[error("ledger has no blocks")]
    EmptyLedger,
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::EmptyLedger => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
