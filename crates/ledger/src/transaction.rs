use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tinyledger_core::{LedgerId, TransactionId};

use crate::money::Money;

/// Direction of a posted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
        }
    }
}

impl core::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posted transaction (immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub ledger_id: LedgerId,
    pub kind: TransactionType,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn record(ledger_id: LedgerId, kind: TransactionType, amount: Money) -> Self {
        Self {
            id: TransactionId::new(),
            ledger_id,
            kind,
            amount,
            occurred_at: Utc::now(),
        }
    }
}
