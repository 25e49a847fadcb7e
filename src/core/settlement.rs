use crate::constants::SETTLEMENT_EPSILON;
use crate::core::balance::Balances;
use crate::core::models::{Payment, UserId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Every debtor pays creditors in order. More payments, but each one
    /// reads as "who owes whom".
    Standard,
    /// Largest debtor pays largest creditor, minimising the payment count.
    Simplified,
}

impl Strategy {
    pub fn from_simplify_flag(simplify_debts: bool) -> Self {
        if simplify_debts {
            Strategy::Simplified
        } else {
            Strategy::Standard
        }
    }
}

/// Payments that bring every balance in `balances` to within
/// `SETTLEMENT_EPSILON` of zero. Empty when everything is already settled.
pub fn compute_settlement(balances: &Balances, strategy: Strategy) -> Vec<Payment> {
    debug!("Settling {} balances with {:?} strategy", balances.len(), strategy);
    let payments = match strategy {
        Strategy::Standard => standard_settlement(balances),
        Strategy::Simplified => simplified_settlement(balances),
    };
    debug!("Settlement payments: {:?}", payments);
    payments
}

/// Balances the strategies can work with. A NaN or infinite balance cannot
/// be paid off, so its holder is left out of the settlement.
fn settleable_entries(balances: &Balances) -> Vec<(UserId, f64)> {
    balances
        .iter()
        .filter_map(|(user, bal)| {
            if bal.is_finite() {
                Some((user.to_string(), bal))
            } else {
                warn!("Leaving {} out of settlement: balance {} is not finite", user, bal);
                None
            }
        })
        .collect()
}

fn standard_settlement(balances: &Balances) -> Vec<Payment> {
    let entries = settleable_entries(balances);
    let mut debtors: Vec<(UserId, f64)> = entries
        .iter()
        .filter(|(_, bal)| *bal < -SETTLEMENT_EPSILON)
        .map(|(user, bal)| (user.clone(), -bal))
        .collect();

    let mut creditors: Vec<(UserId, f64)> = entries
        .iter()
        .filter(|(_, bal)| *bal > SETTLEMENT_EPSILON)
        .cloned()
        .collect();

    let mut payments = Vec::new();
    for (debtor_id, remaining) in debtors.iter_mut() {
        for (creditor_id, credit) in creditors.iter_mut() {
            if *remaining <= SETTLEMENT_EPSILON {
                break;
            }
            if *credit <= SETTLEMENT_EPSILON {
                continue;
            }
            let amount = remaining.min(*credit);
            payments.push(Payment::new(debtor_id.clone(), creditor_id.clone(), amount));
            *remaining -= amount;
            *credit -= amount;
        }
    }
    payments
}

fn simplified_settlement(balances: &Balances) -> Vec<Payment> {
    let mut entries: Vec<(UserId, f64)> = settleable_entries(balances)
        .into_iter()
        .map(|(user, bal)| {
            let bal = if bal.abs() < SETTLEMENT_EPSILON { 0.0 } else { bal };
            (user, bal)
        })
        .collect();
    // Stable sort keeps input order among equal balances.
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut payments = Vec::new();
    if entries.len() < 2 {
        return payments;
    }
    let mut i = 0;
    let mut j = entries.len() - 1;

    while i < j {
        let debt = -entries[i].1;
        let credit = entries[j].1;
        if debt < SETTLEMENT_EPSILON {
            i += 1;
            continue;
        }
        if credit < SETTLEMENT_EPSILON {
            j -= 1;
            continue;
        }

        let amount = debt.min(credit);
        payments.push(Payment::new(entries[i].0.clone(), entries[j].0.clone(), amount));
        entries[i].1 += amount;
        entries[j].1 -= amount;

        if entries[i].1.abs() < SETTLEMENT_EPSILON {
            i += 1;
        }
        if entries[j].1.abs() < SETTLEMENT_EPSILON {
            j -= 1;
        }
    }
    payments
}

/// Balances after every payment is treated as an adjustment from payer to payee.
pub fn apply_payments(balances: &Balances, payments: &[Payment]) -> Balances {
    let mut after = balances.clone();
    for payment in payments {
        after.credit(&payment.payer, payment.amount);
        after.credit(&payment.payee, -payment.amount);
    }
    after
}
