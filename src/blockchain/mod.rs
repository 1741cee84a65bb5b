pub mod block;
pub mod model;
pub mod pow;
pub mod validate;

pub use block::Block;
pub use model::Ledger;
pub use pow::ProofOfWork;
pub use validate::ChainValidator;

use crate::transaction::Amount;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Previous-hash sentinel of the genesis block (it has no predecessor).
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Default Proof-of-Work difficulty (leading zero hex characters).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Amount paid to the node that forges a block.
pub const MINING_REWARD: Amount = Amount::Integer(1);
