use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, MessageResponse, NewTransactionRequest, PendingResponse};
use crate::error::LedgerError;

/// Queue a transaction for the next forged block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> Result<HttpResponse, LedgerError> {
    let tx = body.into_inner().into_transaction().inspect_err(|e| {
        warn!("POST /transactions/new - rejected: {e}");
    })?;

    let index = {
        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        ledger.submit_transaction(tx)?
    };
    info!("POST /transactions/new - queued for block #{index}");

    Ok(HttpResponse::Created().json(MessageResponse {
        message: format!("Transaction will be added to Block {index}"),
    }))
}

/// List transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn pending_transactions(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    let pending = ledger.pending_transactions();
    HttpResponse::Ok().json(PendingResponse {
        length: pending.len(),
        transactions: pending,
    })
}
