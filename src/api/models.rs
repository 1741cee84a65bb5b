use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::blockchain::{Block, Ledger, ProofOfWork};
use crate::error::LedgerError;
use crate::network::NodeRegistry;
use crate::transaction::{Amount, Transaction};

/// Shared application state: one ledger and one peer registry per process,
/// handed to every handler through `web::Data`.
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    pub nodes: RwLock<NodeRegistry>,
    pub pow: ProofOfWork,
    /// Recipient of this node's mining rewards.
    pub node_id: String,
}

impl AppState {
    pub fn new(node_id: String, pow: ProofOfWork) -> Self {
        Self {
            ledger: RwLock::new(Ledger::new()),
            nodes: RwLock::new(NodeRegistry::new()),
            pow,
            node_id,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    #[serde(rename = "transaction")]
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

/// Fields are optional so a missing one is reported by name instead of as a
/// generic deserialization failure.
#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Amount>,
}

impl NewTransactionRequest {
    pub fn into_transaction(self) -> Result<Transaction, LedgerError> {
        let sender = self.sender.ok_or(LedgerError::MissingField("sender"))?;
        let recipient = self
            .recipient
            .ok_or(LedgerError::MissingField("recipient"))?;
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        Transaction::new(sender, recipient, amount)
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub length: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Replaced {
        message: &'static str,
        new_chain: Vec<Block>,
    },
    Authoritative {
        message: &'static str,
        chain: Vec<Block>,
    },
}
