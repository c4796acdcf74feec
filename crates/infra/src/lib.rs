//! Infrastructure adapters: storage behind the repository traits.
//!
//! Only in-memory storage exists today; the traits are the seam for anything
//! durable.

pub mod repository;
pub mod store;

pub use repository::{
    InMemoryLedgerRepository, InMemoryUserRepository, LedgerRepository, UserRepository,
};
pub use store::InMemoryStore;
