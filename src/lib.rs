pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::balance::{Balances, compute_balances};
pub use crate::core::currency::{Currency, convert};
pub use crate::core::direct::PairwiseLedger;
pub use crate::core::errors::LedgerError;
pub use crate::core::services::{LedgerService, NewExpense, Session};
pub use crate::core::settlement::{Strategy, apply_payments, compute_settlement};
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryDocumentStore;

#[cfg(test)]
mod tests; // Include integration tests
