use super::model::Transaction;

/// Transactions accepted but not yet sealed into a block, in arrival order.
#[derive(Debug, Default)]
pub struct TransactionPool {
    pending: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn submit(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Take every pending transaction, leaving the pool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_submission_order_and_empties() {
        let mut pool = TransactionPool::new();
        let t1 = Transaction::new("alice", "bob", 5.0).unwrap();
        let t2 = Transaction::new("bob", "carol", 1.5).unwrap();
        pool.submit(t1.clone());
        pool.submit(t2.clone());
        assert_eq!(pool.pending(), [t1.clone(), t2.clone()]);

        let drained = pool.drain();
        assert_eq!(drained, vec![t1, t2]);
        assert!(pool.pending().is_empty());
        assert!(pool.drain().is_empty());
    }
}
