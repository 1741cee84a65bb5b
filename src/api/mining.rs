use actix_web::{HttpResponse, get, web};
use log::{debug, info, warn};
use std::time::Instant;

use super::models::{AppState, MineResponse};
use crate::blockchain::MINING_REWARD;
use crate::transaction::REWARD_SENDER;

/// Forge a new block from the pending transactions:
/// - Snapshot the tip under a short read lock
/// - Search for the proof on the blocking pool with no lock held
/// - Re-lock, and if the tip moved meanwhile, search again against the new tip
/// - Queue this node's reward and seal the block
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let t0 = Instant::now();
    let pow = state.pow;

    let block = loop {
        let (tip_hash, last_proof) = {
            let ledger = state.ledger.read().expect("ledger lock poisoned");
            let tip = ledger.last_block()?;
            (tip.hash(), tip.proof)
        };

        let proof = web::block(move || pow.search(last_proof)).await?;
        debug!("MINER - proof {proof} found after {last_proof}");

        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        if ledger.last_block()?.hash() != tip_hash {
            warn!("MINER - chain advanced during search, retrying against the new tip");
            continue;
        }
        ledger.new_transaction(REWARD_SENDER, &state.node_id, MINING_REWARD)?;
        break ledger.append(proof, None)?;
    };

    info!(
        "MINER - forged block #{} (proof={}, {} ms)",
        block.index,
        block.proof,
        t0.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New Block Forged",
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}
