//! Application services: use-case orchestration over the repositories.

use std::sync::Arc;

use tinyledger_core::{DomainError, DomainResult, LedgerId, UserId};
use tinyledger_infra::{
    InMemoryLedgerRepository, InMemoryUserRepository, LedgerRepository, UserRepository,
};
use tinyledger_ledger::{Balance, Ledger, Money, Transaction, TransactionType};
use tinyledger_users::User;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub fn create_user(
        &self,
        first_name: String,
        last_name: String,
        email_address: Option<String>,
    ) -> DomainResult<Arc<User>> {
        let user = self
            .users
            .save(User::register(first_name, last_name, email_address))?;
        tracing::info!(user_id = %user.id_typed(), "user registered");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> DomainResult<Arc<User>> {
        self.users
            .get(id)
            .ok_or_else(|| DomainError::user_not_found(id))
    }
}

#[derive(Clone)]
pub struct LedgerService {
    ledgers: Arc<dyn LedgerRepository>,
    users: UserService,
}

impl LedgerService {
    pub fn new(ledgers: Arc<dyn LedgerRepository>, users: UserService) -> Self {
        Self { ledgers, users }
    }

    /// All ledgers, or only those owned by `user_id` when given.
    pub fn list_ledgers(&self, user_id: Option<UserId>) -> Vec<Arc<Ledger>> {
        match user_id {
            Some(user_id) => self.ledgers.list_by_user(user_id),
            None => self.ledgers.list(),
        }
    }

    pub fn get_ledger(&self, id: LedgerId) -> DomainResult<Arc<Ledger>> {
        self.ledgers
            .get(id)
            .ok_or_else(|| DomainError::ledger_not_found(id))
    }

    /// Open a ledger for an existing user.
    pub fn create_ledger(&self, name: String, user_id: UserId) -> DomainResult<Arc<Ledger>> {
        let user = self.users.get_user(user_id)?;
        let ledger = self.ledgers.save(Ledger::open(name, user.id_typed()))?;
        tracing::info!(ledger_id = %ledger.id_typed(), user_id = %user_id, "ledger opened");
        Ok(ledger)
    }

    pub fn create_transaction(
        &self,
        ledger_id: LedgerId,
        kind: TransactionType,
        amount: Money,
    ) -> DomainResult<Transaction> {
        let ledger = self.get_ledger(ledger_id)?;
        match ledger.apply(kind, amount) {
            Ok(tx) => {
                tracing::info!(
                    ledger_id = %ledger_id,
                    transaction_id = %tx.id,
                    kind = %kind,
                    amount = amount.amount(),
                    "transaction posted"
                );
                Ok(tx)
            }
            Err(e) => {
                tracing::warn!(ledger_id = %ledger_id, kind = %kind, error = %e, "transaction rejected");
                Err(e)
            }
        }
    }

    pub fn transactions(&self, ledger_id: LedgerId) -> DomainResult<Vec<Transaction>> {
        Ok(self.get_ledger(ledger_id)?.transactions())
    }

    pub fn balance(&self, ledger_id: LedgerId) -> DomainResult<Balance> {
        Ok(self.get_ledger(ledger_id)?.balance_snapshot())
    }
}

/// Everything the handlers need, shared through an axum `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub users: UserService,
    pub ledgers: LedgerService,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserRepository>, ledgers: Arc<dyn LedgerRepository>) -> Self {
        let users = UserService::new(users);
        let ledgers = LedgerService::new(ledgers, users.clone());
        Self { users, ledgers }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryLedgerRepository::new()),
        )
    }
}
