use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};
use crate::blockchain::ChainValidator;
use crate::error::LedgerError;

/// Get the full chain. Peers consume this same envelope during consensus.
#[get("/chain")]
pub async fn full_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the local chain.
#[get("/chain/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    if ledger.is_empty() {
        return Err(LedgerError::EmptyLedger);
    }
    Ok(HttpResponse::Ok().json(ValidateResponse {
        valid: ChainValidator::new(state.pow).is_valid(ledger.chain()),
        length: ledger.len(),
    }))
}
