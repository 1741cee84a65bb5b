pub mod model;
pub mod pool;

pub use model::{Amount, REWARD_SENDER, Transaction};
pub use pool::TransactionPool;
