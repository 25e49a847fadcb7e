use crate::constants::SETTLEMENT_EPSILON;
use crate::core::models::{Adjustment, Expense, Payment, UserId};
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};

/// Ordered pair `(creditor, debtor)`; a positive balance means the second
/// user owes the first.
pub type UserPair = (UserId, UserId);

/// Signed running totals between pairs of friends, built from two-party
/// expenses that do not belong to any group.
#[derive(Clone, Debug, Default)]
pub struct PairwiseLedger {
    balances: HashMap<UserPair, f64>,
}

impl PairwiseLedger {
    pub fn new() -> Self {
        PairwiseLedger {
            balances: HashMap::new(),
        }
    }

    pub fn from_records(expenses: &[Expense], adjustments: &[Adjustment]) -> Self {
        let mut ledger = PairwiseLedger::new();
        for expense in expenses {
            ledger.record_expense(expense);
        }
        for adjustment in adjustments {
            ledger.record_adjustment(adjustment);
        }
        ledger
    }

    fn shift(&mut self, creditor: &str, debtor: &str, amount: f64) {
        *self
            .balances
            .entry((creditor.to_string(), debtor.to_string()))
            .or_insert(0.0) += amount;
        *self
            .balances
            .entry((debtor.to_string(), creditor.to_string()))
            .or_insert(0.0) -= amount;
    }

    /// Adds the non-payer's share of a two-party expense. Returns whether the
    /// expense was applied.
    pub fn record_expense(&mut self, expense: &Expense) -> bool {
        let Some(share) = expense.share() else {
            warn!("Skipping direct expense {} with invalid amount", expense.id);
            return false;
        };
        if expense.participants.len() != 2 {
            warn!(
                "Skipping direct expense {} with {} participants",
                expense.id,
                expense.participants.len()
            );
            return false;
        }
        let payer = &expense.paid_by.id;
        let Some(other) = expense.participants.iter().find(|p| &p.id != payer) else {
            return false;
        };
        if !expense.participants.iter().any(|p| &p.id == payer) {
            warn!("Skipping direct expense {}: payer {} is not a participant", expense.id, payer);
            return false;
        }
        debug!("Direct expense {}: {} owes {} {}", expense.id, other.id, payer, share);
        self.shift(payer, &other.id, share);
        true
    }

    /// `from` paid `to`, reducing what `from` owes `to`.
    pub fn record_adjustment(&mut self, adjustment: &Adjustment) -> bool {
        if !adjustment.amount.is_finite() || adjustment.from == adjustment.to {
            warn!("Skipping direct adjustment {}", adjustment.id);
            return false;
        }
        self.shift(&adjustment.from.id, &adjustment.to.id, adjustment.amount);
        true
    }

    /// How much `debtor` owes `creditor`, netting both directions of the pair.
    /// Negative when the creditor is the one who owes.
    pub fn owed(&self, debtor: &str, creditor: &str) -> f64 {
        let forward = self
            .balances
            .get(&(creditor.to_string(), debtor.to_string()))
            .copied()
            .unwrap_or(0.0);
        let backward = self
            .balances
            .get(&(debtor.to_string(), creditor.to_string()))
            .copied()
            .unwrap_or(0.0);
        (forward - backward) / 2.0
    }

    /// Every friend `user_id` shares a running total with, with the amount the
    /// friend owes `user_id` (negative when `user_id` owes the friend).
    /// Sorted by friend id.
    pub fn counterparties(&self, user_id: &str) -> Vec<(UserId, f64)> {
        let friends: BTreeSet<&UserId> = self
            .balances
            .keys()
            .filter(|(creditor, _)| creditor == user_id)
            .map(|(_, debtor)| debtor)
            .collect();
        friends
            .into_iter()
            .map(|friend| (friend.clone(), self.owed(friend, user_id)))
            .collect()
    }

    /// Sum of what every friend owes `user_id`.
    pub fn net_position(&self, user_id: &str) -> f64 {
        self.counterparties(user_id).iter().map(|(_, amount)| amount).sum()
    }

    /// The single payment that zeroes the pair, if any is due.
    pub fn settlement_between(&self, a: &str, b: &str) -> Option<Payment> {
        let owed = self.owed(a, b);
        if owed > SETTLEMENT_EPSILON {
            Some(Payment::new(a, b, owed))
        } else if owed < -SETTLEMENT_EPSILON {
            Some(Payment::new(b, a, -owed))
        } else {
            None
        }
    }
}
