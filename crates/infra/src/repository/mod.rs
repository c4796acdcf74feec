//! Repository traits and their in-memory implementations.

pub mod ledgers;
pub mod users;

pub use ledgers::{InMemoryLedgerRepository, LedgerRepository};
pub use users::{InMemoryUserRepository, UserRepository};
