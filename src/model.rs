//! Wire types: the response envelope and the transaction record.
//!
//! The envelope carries the model's JSON verbatim. [`Transaction`] is the
//! shape the prompt asks for; it is only applied on request through
//! [`Envelope::typed_transactions`], never on the relay path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level JSON object returned to the caller, tagged by `status`.
///
/// ```json
/// {"status": "success", "transactions": [...]}
/// {"status": "error", "message": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success { transactions: Value },
    Error { message: String },
}

impl Envelope {
    pub fn success(transactions: Value) -> Self {
        Envelope::Success { transactions }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// Read the relayed JSON as [`Transaction`] records.
    ///
    /// Returns `None` for an error envelope. The inner `Err` means the model
    /// did not follow the requested shape.
    pub fn typed_transactions(&self) -> Option<Result<Vec<Transaction>, serde_json::Error>> {
        match self {
            Envelope::Success { transactions } => {
                Some(Vec::<Transaction>::deserialize(transactions))
            }
            Envelope::Error { .. } => None,
        }
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Debit,
    Credit,
}

/// One statement line as requested from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date as printed on the statement (requested as `DD/MM/YYYY`).
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Amount signed by direction: debits negative, credits positive.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Debit => -self.amount.abs(),
            TransactionKind::Credit => self.amount.abs(),
        }
    }
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub count: usize,
    pub total_debits: f64,
    pub total_credits: f64,
}

impl TransactionSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut acc, tx| {
            acc.count += 1;
            let signed = tx.signed_amount();
            if signed < 0.0 {
                acc.total_debits -= signed;
            } else {
                acc.total_credits += signed;
            }
            acc
        })
    }

    /// Credits minus debits.
    pub fn net(&self) -> f64 {
        self.total_credits - self.total_debits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let env = Envelope::success(json!([]));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"status": "success", "transactions": []})
        );
    }

    #[test]
    fn error_envelope_shape() {
        let env = Envelope::error("boom");
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
    }

    #[test]
    fn success_envelope_relays_non_array_json() {
        let env = Envelope::success(json!({"note": "model ignored the format"}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["transactions"]["note"], "model ignored the format");
    }

    #[test]
    fn typed_transactions_reads_requested_shape() {
        let env = Envelope::success(json!([
            {"date": "01/02/2024", "description": "SALARY", "amount": 2500.0, "type": "credit"},
            {"date": "03/02/2024", "description": "RENT", "amount": 900, "type": "debit"}
        ]));
        let txs = env.typed_transactions().unwrap().unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].kind, TransactionKind::Credit);
        assert_eq!(txs[1].signed_amount(), -900.0);
    }

    #[test]
    fn typed_transactions_reports_shape_violations() {
        let env = Envelope::success(json!([{"date": "x", "amount": "12"}]));
        assert!(env.typed_transactions().unwrap().is_err());
        assert!(Envelope::error("x").typed_transactions().is_none());
    }

    #[test]
    fn summary_totals_by_direction() {
        let txs = vec![
            Transaction {
                date: "01/01/2024".into(),
                description: "PAY".into(),
                amount: 100.0,
                kind: TransactionKind::Credit,
            },
            Transaction {
                date: "02/01/2024".into(),
                description: "SHOP".into(),
                amount: -30.0,
                kind: TransactionKind::Debit,
            },
        ];
        let s = TransactionSummary::from_transactions(&txs);
        assert_eq!(s.count, 2);
        assert_eq!(s.total_credits, 100.0);
        assert_eq!(s.total_debits, 30.0);
        assert_eq!(s.net(), 70.0);
    }

    #[test]
    fn summary_follows_type_not_amount_sign() {
        let txs = vec![
            Transaction {
                date: "05/01/2024".into(),
                description: "REFUND".into(),
                amount: -12.5,
                kind: TransactionKind::Credit,
            },
            Transaction {
                date: "06/01/2024".into(),
                description: "FEE".into(),
                amount: 2.5,
                kind: TransactionKind::Debit,
            },
        ];
        let s = TransactionSummary::from_transactions(&txs);
        assert_eq!(s.total_credits, 12.5);
        assert_eq!(s.total_debits, 2.5);
        assert_eq!(s.net(), 10.0);
    }
}
