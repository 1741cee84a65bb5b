use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A sealed block. Field order here is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // Unix epoch seconds (UTC), sub-second precision
    pub transactions: Vec<Transaction>,
    pub proof: u64, // Proof-of-Work nonce
    pub previous_hash: String,
}

impl Block {
    /// The fixed first block: index 1, genesis proof, sentinel previous hash.
    pub fn genesis() -> Self {
        Self::new(
            1,
            Vec::new(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: now_secs(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the block's canonical JSON form, hex encoded.
    ///
    /// The block is first converted to a `serde_json::Value`; its object map is
    /// BTreeMap-backed, so keys (nested ones included) serialize sorted and the
    /// digest never depends on declaration order.
    pub fn hash(&self) -> String {
        let canonical = serde_json::to_value(self).expect("block serializes to json");
        let bytes = serde_json::to_vec(&canonical).expect("json value serializes");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
