use std::sync::Arc;

use tinyledger_core::{DomainError, DomainResult, LedgerId, UserId};
use tinyledger_ledger::Ledger;

use crate::store::InMemoryStore;

/// Storage for ledgers.
///
/// Stored ledgers are handed out as `Arc<Ledger>`; postings mutate them in
/// place through the ledger's own lock, so nothing needs to be written back.
pub trait LedgerRepository: Send + Sync {
    /// Store a new ledger. Fails if a ledger with the same id exists.
    fn save(&self, ledger: Ledger) -> DomainResult<Arc<Ledger>>;
    fn get(&self, id: LedgerId) -> Option<Arc<Ledger>>;
    /// All ledgers in creation order.
    fn list(&self) -> Vec<Arc<Ledger>>;
    fn list_by_user(&self, user_id: UserId) -> Vec<Arc<Ledger>>;
}

impl<S> LedgerRepository for Arc<S>
where
    S: LedgerRepository + ?Sized,
{
    fn save(&self, ledger: Ledger) -> DomainResult<Arc<Ledger>> {
        (**self).save(ledger)
    }

    fn get(&self, id: LedgerId) -> Option<Arc<Ledger>> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<Arc<Ledger>> {
        (**self).list()
    }

    fn list_by_user(&self, user_id: UserId) -> Vec<Arc<Ledger>> {
        (**self).list_by_user(user_id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    ledgers: InMemoryStore<LedgerId, Arc<Ledger>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn save(&self, ledger: Ledger) -> DomainResult<Arc<Ledger>> {
        let id = ledger.id_typed();
        let ledger = Arc::new(ledger);
        if !self.ledgers.insert_new(id, ledger.clone()) {
            return Err(DomainError::ledger_already_exists(id));
        }
        tracing::debug!(ledger_id = %id, "ledger stored");
        Ok(ledger)
    }

    fn get(&self, id: LedgerId) -> Option<Arc<Ledger>> {
        self.ledgers.get(&id)
    }

    fn list(&self) -> Vec<Arc<Ledger>> {
        self.ledgers.list()
    }

    fn list_by_user(&self, user_id: UserId) -> Vec<Arc<Ledger>> {
        self.ledgers.list_filtered(|l| l.user_id() == user_id)
    }
}
