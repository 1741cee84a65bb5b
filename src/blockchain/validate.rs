use log::debug;
use thiserror::Error;

use super::{Block, ProofOfWork};

/// Why a candidate chain was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainFault {
    #[error("chain is empty")]
    Empty,

    #[error("block at position {position} has index {found}, expected {expected}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },

    #[error("block at position {position} does not link to the hash of its predecessor")]
    BrokenLink { position: usize },

    #[error("block at position {position} has proof {proof}, which fails the proof of work")]
    InvalidProof { position: usize, proof: u64 },
}

/// Structural and proof-of-work validation of whole chains, local or
/// peer-supplied. The first block is accepted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    pub fn check(&self, chain: &[Block]) -> Result<(), ChainFault> {
        if chain.is_empty() {
            return Err(ChainFault::Empty);
        }

        for (position, pair) in chain.windows(2).enumerate().map(|(i, w)| (i + 1, w)) {
            let (prev, current) = (&pair[0], &pair[1]);

            if prev.index.checked_add(1) != Some(current.index) {
                return Err(ChainFault::IndexGap {
                    position,
                    expected: prev.index.saturating_add(1),
                    found: current.index,
                });
            }

            if current.previous_hash != prev.hash() {
                return Err(ChainFault::BrokenLink { position });
            }

            if !self.pow.valid(prev.proof, current.proof) {
                return Err(ChainFault::InvalidProof {
                    position,
                    proof: current.proof,
                });
            }
        }

        Ok(())
    }

    pub fn is_valid(&self, chain: &[Block]) -> bool {
        match self.check(chain) {
            Ok(()) => true,
            Err(fault) => {
                debug!("VALIDATE - chain of {} blocks rejected: {fault}", chain.len());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::ledger_with_blocks;
    use crate::transaction::Amount;

    #[test]
    fn accepts_genesis_only_chain() {
        let ledger = ledger_with_blocks(&ProofOfWork::default(), 0);
        assert!(ChainValidator::default().is_valid(ledger.chain()));
    }

    #[test]
    fn rejects_empty_chain() {
        assert_eq!(ChainValidator::default().check(&[]), Err(ChainFault::Empty));
        assert!(!ChainValidator::default().is_valid(&[]));
    }

    #[test]
    fn accepts_mined_chain() {
        let pow = ProofOfWork::default();
        let ledger = ledger_with_blocks(&pow, 2);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ChainValidator::new(pow).check(ledger.chain()), Ok(()));
    }

    #[test]
    fn tampered_amount_breaks_linkage() {
        let pow = ProofOfWork::default();
        let ledger = ledger_with_blocks(&pow, 2);
        let mut chain = ledger.chain().to_vec();
        assert!(!chain[1].transactions.is_empty());

        chain[1].transactions[0].amount = Amount::Integer(1_000);
        assert_eq!(
            ChainValidator::new(pow).check(&chain),
            Err(ChainFault::BrokenLink { position: 2 })
        );
    }

    #[test]
    fn rejects_bad_proof() {
        let pow = ProofOfWork::new(2);
        let ledger = ledger_with_blocks(&pow, 1);
        let mut chain = ledger.chain().to_vec();
        let mut bad = chain[1].proof + 1;
        while pow.valid(chain[0].proof, bad) {
            bad += 1;
        }
        chain[1].proof = bad;
        assert_eq!(
            ChainValidator::new(pow).check(&chain),
            Err(ChainFault::InvalidProof {
                position: 1,
                proof: bad
            })
        );
    }

    #[test]
    fn rejects_index_gap() {
        let pow = ProofOfWork::new(2);
        let ledger = ledger_with_blocks(&pow, 1);
        let mut chain = ledger.chain().to_vec();
        chain[1].index = 5;
        assert_eq!(
            ChainValidator::new(pow).check(&chain),
            Err(ChainFault::IndexGap {
                position: 1,
                expected: 2,
                found: 5
            })
        );
    }

    #[test]
    fn proofs_are_judged_at_the_validator_difficulty() {
        let easy = ProofOfWork::new(1);
        let ledger = ledger_with_blocks(&easy, 3);
        // Proofs are a pure function of the genesis proof, and the ones found
        // at difficulty 1 fall far short of difficulty 8.
        assert!(ChainValidator::new(ProofOfWork::new(0)).is_valid(ledger.chain()));
        assert!(!ChainValidator::new(ProofOfWork::new(8)).is_valid(ledger.chain()));
    }
}
