use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

use super::DEFAULT_DIFFICULTY;

/// How many candidate proofs are tried between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Proof-of-Work over pairs of consecutive proofs.
///
/// A proof is accepted when `sha256("{last_proof}{proof}")`, in hex, starts
/// with `difficulty` zero characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Hex digest of the decimal concatenation of both proofs.
    pub fn guess_hash(last_proof: u64, proof: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{last_proof}{proof}").as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn valid(&self, last_proof: u64, proof: u64) -> bool {
        let hash = Self::guess_hash(last_proof, proof);
        hash.len() >= self.difficulty && hash.bytes().take(self.difficulty).all(|c| c == b'0')
    }

    /// Smallest proof that is valid after `last_proof`. Runs until found.
    pub fn search(&self, last_proof: u64) -> u64 {
        let never = AtomicBool::new(false);
        match self.search_cancellable(last_proof, &never) {
            Some(proof) => proof,
            None => unreachable!("search flag is never set"),
        }
    }

    /// Same search as [`ProofOfWork::search`], abandoned with `None` once
    /// `cancel` is set. The flag is polled every few thousand candidates.
    pub fn search_cancellable(&self, last_proof: u64, cancel: &AtomicBool) -> Option<u64> {
        let mut proof = 0;
        loop {
            if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                log::debug!("POW - search after {last_proof} cancelled at proof {proof}");
                return None;
            }
            if self.valid(last_proof, proof) {
                return Some(proof);
            }
            proof += 1;
        }
    }
}
