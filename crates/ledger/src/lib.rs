//! Ledger module (single-account ledgers with deposits and withdrawals).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod ledger;
pub mod money;
pub mod transaction;

pub use ledger::{Balance, Ledger};
pub use money::Money;
pub use transaction::{Transaction, TransactionType};
