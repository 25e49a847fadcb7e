use super::activity::Activity;
use super::adjustment::Adjustment;
use super::expense::Expense;
use super::user::User;
use crate::core::currency::Currency;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<User>,
    pub expenses: Vec<Expense>,
    pub adjustments: Vec<Adjustment>,
    pub activity: Vec<Activity>,
    pub currency: Currency,
    pub simplify_debts: bool,
}

impl Group {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    pub fn member(&self, user_id: &str) -> Option<&User> {
        self.members.iter().find(|m| m.id == user_id)
    }

    pub fn expense(&self, expense_id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == expense_id)
    }

    /// Total of all countable expenses, in the group currency.
    pub fn total_spent(&self) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.is_countable())
            .map(|e| e.amount)
            .sum()
    }
}
