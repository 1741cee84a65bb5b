use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Sender used for mining rewards, which have no real originator.
pub const REWARD_SENDER: &str = "0";

/// A transferred quantity. Whole numbers stay exact integers on the wire;
/// anything with a fractional part or exponent is carried as a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(u64),
    Decimal(f64),
}

impl Amount {
    fn is_valid(&self) -> bool {
        match *self {
            Amount::Integer(_) => true,
            Amount::Decimal(v) => v.is_finite() && v >= 0.0,
        }
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Amount::Integer(v)
    }
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Amount::Decimal(v)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Integer(v) => write!(f, "{v}"),
            Amount::Decimal(v) => write!(f, "{v}"),
        }
    }
}

/// A value transfer waiting to be (or already) sealed into a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Amount,
}

impl Transaction {
    /// Build a transaction, rejecting amounts that are negative or not finite.
    /// Sender and recipient are opaque identifiers and are not interpreted.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Amount>,
    ) -> Result<Self, LedgerError> {
        let amount = amount.into();
        if !amount.is_valid() {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        assert_eq!(
            Transaction::new("a", "b", -1.0),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            Transaction::new("a", "b", f64::NAN),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            Transaction::new("a", "b", f64::INFINITY),
            Err(LedgerError::InvalidAmount)
        );
    }

    #[test]
    fn accepts_zero_integer_and_decimal_amounts() {
        assert!(Transaction::new("a", "b", 0u64).is_ok());
        assert!(Transaction::new("a", "b", 0.0).is_ok());
        let tx = Transaction::new("a", "b", 2.5).unwrap();
        assert_eq!(tx.amount, Amount::Decimal(2.5));
    }

    #[test]
    fn integer_amounts_stay_integers_on_the_wire() {
        let tx: Transaction =
            serde_json::from_str(r#"{"sender":"a","recipient":"b","amount":5}"#).unwrap();
        assert_eq!(tx.amount, Amount::Integer(5));
        assert_eq!(
            serde_json::to_string(&tx).unwrap(),
            r#"{"sender":"a","recipient":"b","amount":5}"#
        );

        // Above 2^53 an f64 would round; the integer form must not.
        let big = (1u64 << 53) + 1;
        let json = format!(r#"{{"sender":"a","recipient":"b","amount":{big}}}"#);
        let tx: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx.amount, Amount::Integer(big));
        assert_eq!(serde_json::to_string(&tx).unwrap(), json);
    }

    #[test]
    fn decimal_amounts_survive_the_wire_exactly() {
        for v in [3.7861672012850707, 0.1, 2.0000000000000004, 1e-300, 5.0] {
            let tx = Transaction::new("a", "b", v).unwrap();
            let back: Transaction =
                serde_json::from_str(&serde_json::to_string(&tx).unwrap()).unwrap();
            assert_eq!(back.amount, Amount::Decimal(v), "{v}");
        }
    }

    #[test]
    fn negative_wire_amount_is_rejected_on_submit() {
        let tx: Transaction =
            serde_json::from_str(r#"{"sender":"a","recipient":"b","amount":-4}"#).unwrap();
        assert_eq!(tx.amount, Amount::Decimal(-4.0));
        assert_eq!(
            Transaction::new(tx.sender, tx.recipient, tx.amount),
            Err(LedgerError::InvalidAmount)
        );
    }
}
