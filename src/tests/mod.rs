mod balance_tests;
mod settlement_tests;

use crate::core::models::{Adjustment, AdjustmentKind, Expense, User};
use crate::core::services::{LedgerService, Session};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryDocumentStore;
use chrono::Utc;

/// Service plus a second handle on the same store for direct inspection.
pub fn create_test_service() -> (LedgerService<InMemoryLogging, InMemoryDocumentStore>, InMemoryDocumentStore) {
    crate::config::init_logging();
    let storage = InMemoryDocumentStore::new();
    let logging = InMemoryLogging::new();
    (LedgerService::new(storage.clone(), logging), storage)
}

pub fn user(id: &str) -> User {
    User::new(id, id.to_uppercase())
}

pub fn session(id: &str) -> Session {
    Session::new(user(id))
}

/// Expense built without validation, to feed the engine malformed data.
pub fn raw_expense(id: &str, amount: f64, payer: &str, participants: &[&str]) -> Expense {
    Expense {
        id: id.to_string(),
        title: format!("expense {}", id),
        amount,
        paid_by: user(payer),
        participants: participants.iter().map(|p| user(p)).collect(),
        date: Utc::now(),
        group_id: None,
        category: None,
        recurring: false,
        comments: Vec::new(),
    }
}

pub fn adjustment(from: &str, to: &str, amount: f64) -> Adjustment {
    Adjustment::new(user(from), user(to), amount, AdjustmentKind::Manual)
}

pub fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

/// Deterministic pseudo-random ledgers for property checks.
pub fn generated_ledger(seed: u64, people: usize, count: usize) -> (Vec<User>, Vec<Expense>) {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    let ids: Vec<String> = (0..people).map(|i| format!("u{}", i)).collect();
    let members = ids.iter().map(|id| user(id)).collect();
    let mut expenses = Vec::new();
    for n in 0..count {
        let amount = (next() % 100_000) as f64 / 100.0;
        let payer = ids[next() % people].clone();
        let take = 1 + next() % people;
        let participants: Vec<&str> = ids.iter().take(take).map(|s| s.as_str()).collect();
        expenses.push(raw_expense(&format!("g{}", n), amount, &payer, &participants));
    }
    (members, expenses)
}
