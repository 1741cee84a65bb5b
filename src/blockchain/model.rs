use log::{debug, info};

use super::Block;
use crate::error::LedgerError;
use crate::transaction::{Amount, Transaction, TransactionPool};

/// In-memory chain plus the pool of transactions waiting for the next block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pool: TransactionPool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a new ledger holding only the genesis block.
    pub fn new() -> Self {
        let genesis = Block::genesis();
        debug!("LEDGER - genesis block created (proof={})", genesis.proof);
        Self {
            chain: vec![genesis],
            pool: TransactionPool::new(),
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyLedger)
    }

    /// Queue a transaction; returns the index of the block expected to hold it.
    pub fn submit_transaction(&mut self, tx: Transaction) -> Result<u64, LedgerError> {
        let next_index = self.last_block()?.index + 1;
        debug!(
            "POOL - {} -> {} ({}) queued for block #{}",
            tx.sender, tx.recipient, tx.amount, next_index
        );
        self.pool.submit(tx);
        Ok(next_index)
    }

    pub fn new_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: impl Into<Amount>,
    ) -> Result<u64, LedgerError> {
        self.submit_transaction(Transaction::new(sender, recipient, amount)?)
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pool.pending()
    }

    /// Seal every pending transaction into a new block carrying `proof`.
    ///
    /// `previous_hash` defaults to the hash of the current last block. The
    /// proof is not checked here; callers search for it first.
    pub fn append(&mut self, proof: u64, previous_hash: Option<String>) -> Result<Block, LedgerError> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block()?.hash(),
        };
        let index = self.chain.len() as u64 + 1;

        let block = Block::new(index, self.pool.drain(), proof, previous_hash);
        info!(
            "LEDGER - appended block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Overwrite the whole chain. Only consensus calls this, after validation.
    pub fn replace_chain(&mut self, new_chain: Vec<Block>) {
        info!(
            "LEDGER - chain replaced ({} -> {} blocks)",
            self.chain.len(),
            new_chain.len()
        );
        self.chain = new_chain;
    }
}
