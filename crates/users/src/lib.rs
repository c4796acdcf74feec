//! Users module (ledger owners).
//!
//! Pure domain types only: no IO, no HTTP, no storage.

pub mod user;

pub use user::User;
