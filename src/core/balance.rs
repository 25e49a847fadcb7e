use crate::constants::SETTLEMENT_EPSILON;
use crate::core::models::{Adjustment, Expense, User, UserId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Net position per user, in first-seen order (group members first).
/// Positive means the user is owed money, negative means the user owes.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(UserId, f64)>", into = "Vec<(UserId, f64)>")]
pub struct Balances {
    entries: Vec<(UserId, f64)>,
    // user id -> slot in `entries`
    index: HashMap<UserId, usize>,
}

impl Balances {
    pub fn new() -> Self {
        Balances::default()
    }

    /// Adds `delta` to the user's balance, appending the user at zero first if absent.
    pub fn credit(&mut self, user_id: &str, delta: f64) {
        match self.index.get(user_id) {
            Some(&idx) => self.entries[idx].1 += delta,
            None => {
                self.index.insert(user_id.to_string(), self.entries.len());
                self.entries.push((user_id.to_string(), delta));
            }
        }
    }

    pub fn get(&self, user_id: &str) -> Option<f64> {
        self.index.get(user_id).map(|&idx| self.entries[idx].1)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.index.contains_key(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, amount)| (id.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every balance. Zero up to floating-point error for any sheet
    /// produced by `compute_balances`.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    pub fn is_settled(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, amount)| amount.abs() < SETTLEMENT_EPSILON)
    }

    pub fn to_map(&self) -> HashMap<UserId, f64> {
        self.entries.iter().cloned().collect()
    }
}

impl fmt::Debug for Balances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Balances").field("entries", &self.entries).finish()
    }
}

impl From<Vec<(UserId, f64)>> for Balances {
    fn from(entries: Vec<(UserId, f64)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Balances> for Vec<(UserId, f64)> {
    fn from(balances: Balances) -> Self {
        balances.entries
    }
}

impl FromIterator<(UserId, f64)> for Balances {
    fn from_iter<I: IntoIterator<Item = (UserId, f64)>>(iter: I) -> Self {
        let mut balances = Balances::new();
        for (user_id, amount) in iter {
            balances.credit(&user_id, amount);
        }
        balances
    }
}

/// Net balance of every user across `expenses` and `adjustments`.
///
/// Every member is present even without activity. Expenses with a NaN,
/// infinite or negative amount, or with no participants, are skipped, as is
/// any expense or adjustment that would push a balance past `f64::MAX`.
/// Adjustments are only applied when both ends are current members.
pub fn compute_balances(members: &[User], expenses: &[Expense], adjustments: &[Adjustment]) -> Balances {
    debug!(
        "Computing balances for {} members, {} expenses, {} adjustments",
        members.len(),
        expenses.len(),
        adjustments.len()
    );
    let mut balances = Balances::new();
    for member in members {
        balances.credit(&member.id, 0.0);
    }

    for expense in expenses {
        let Some(share) = expense.share() else {
            warn!(
                "Skipping expense {} with amount {} and {} participants",
                expense.id,
                expense.amount,
                expense.participants.len()
            );
            continue;
        };
        if !stays_finite(&balances, expense, share) {
            warn!(
                "Skipping expense {} with amount {}: balances would overflow",
                expense.id, expense.amount
            );
            continue;
        }
        for participant in &expense.participants {
            balances.credit(&participant.id, -share);
        }
        balances.credit(&expense.paid_by.id, expense.amount);
    }

    let is_member = |user: &User| members.iter().any(|m| m == user);
    for adjustment in adjustments {
        if !adjustment.amount.is_finite() {
            warn!("Skipping adjustment {} with non-finite amount", adjustment.id);
            continue;
        }
        if !is_member(&adjustment.from) || !is_member(&adjustment.to) {
            debug!(
                "Skipping adjustment {} between {} and {}: not both members",
                adjustment.id, adjustment.from.id, adjustment.to.id
            );
            continue;
        }
        let from_after = balances.get(&adjustment.from.id).unwrap_or(0.0) + adjustment.amount;
        let to_after = balances.get(&adjustment.to.id).unwrap_or(0.0) - adjustment.amount;
        if !from_after.is_finite() || !to_after.is_finite() {
            warn!("Skipping adjustment {}: balances would overflow", adjustment.id);
            continue;
        }
        balances.credit(&adjustment.from.id, adjustment.amount);
        balances.credit(&adjustment.to.id, -adjustment.amount);
    }

    debug!("Balances calculated: {:?}", balances);
    balances
}

/// Whether applying `expense`, in the same order as `compute_balances`,
/// keeps every touched balance finite.
fn stays_finite(balances: &Balances, expense: &Expense, share: f64) -> bool {
    let mut after: HashMap<&str, f64> = HashMap::new();
    for participant in &expense.participants {
        *after
            .entry(participant.id.as_str())
            .or_insert_with(|| balances.get(&participant.id).unwrap_or(0.0)) -= share;
    }
    *after
        .entry(expense.paid_by.id.as_str())
        .or_insert_with(|| balances.get(&expense.paid_by.id).unwrap_or(0.0)) += expense.amount;
    after.values().all(|amount| amount.is_finite())
}
