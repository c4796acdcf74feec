use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use tinyledger_core::{DomainError, DomainResult, Entity, LedgerId, UserId};

use crate::money::Money;
use crate::transaction::{Transaction, TransactionType};

/// Point-in-time balance of a ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub ledger_id: LedgerId,
    pub balance: Money,
}

#[derive(Debug)]
struct LedgerState {
    balance: Money,
    transactions: Vec<Transaction>,
}

/// A single-balance ledger owned by a user.
///
/// Ledgers are shared between concurrent request handlers, so all mutable
/// state lives behind one lock: the balance and the transaction history are
/// always updated together, and a rejected withdrawal leaves both untouched.
#[derive(Debug)]
pub struct Ledger {
    id: LedgerId,
    user_id: UserId,
    name: String,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Open an empty ledger (zero balance, no history) for `user_id`.
    pub fn open(name: impl Into<String>, user_id: UserId) -> Self {
        Self::with_id(LedgerId::new(), name, user_id)
    }

    pub fn with_id(id: LedgerId, name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            state: Mutex::new(LedgerState {
                balance: Money::zero(),
                transactions: Vec::new(),
            }),
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deposit(&self, amount: Money) -> DomainResult<Transaction> {
        let mut state = self.lock();
        let balance = state.balance.add(amount)?;
        Ok(Self::post(&mut state, self.id, balance, TransactionType::Deposit, amount))
    }

    pub fn withdraw(&self, amount: Money) -> DomainResult<Transaction> {
        let mut state = self.lock();
        if state.balance.is_less_than(amount) {
            return Err(DomainError::insufficient_funds(
                state.balance.amount(),
                amount.amount(),
            ));
        }
        let balance = state.balance.subtract(amount)?;
        Ok(Self::post(&mut state, self.id, balance, TransactionType::Withdraw, amount))
    }

    /// Post a transaction of the given kind.
    pub fn apply(&self, kind: TransactionType, amount: Money) -> DomainResult<Transaction> {
        match kind {
            TransactionType::Deposit => self.deposit(amount),
            TransactionType::Withdraw => self.withdraw(amount),
        }
    }

    pub fn balance(&self) -> Money {
        self.lock().balance
    }

    pub fn balance_snapshot(&self) -> Balance {
        Balance {
            ledger_id: self.id,
            balance: self.balance(),
        }
    }

    /// Transaction history ordered by `occurred_at` (oldest first).
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut transactions = self.lock().transactions.clone();
        // Stable: entries stamped within the same instant keep posting order.
        transactions.sort_by_key(|t| t.occurred_at);
        transactions
    }

    fn post(
        state: &mut LedgerState,
        ledger_id: LedgerId,
        balance: Money,
        kind: TransactionType,
        amount: Money,
    ) -> Transaction {
        let transaction = Transaction::record(ledger_id, kind, amount);
        state.balance = balance;
        state.transactions.push(transaction.clone());
        transaction
    }

    // State is only written after every check has passed, so a poisoned lock
    // still guards a consistent balance/history pair.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Entity for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
