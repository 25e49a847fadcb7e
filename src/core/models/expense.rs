use super::user::User;
use crate::core::errors::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Groceries,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Travel,
    Shopping,
    Other,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Money fronted by `paid_by` and shared equally by `participants`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub paid_by: User,
    pub participants: Vec<User>,
    pub date: DateTime<Utc>,
    pub group_id: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub recurring: bool,
    pub comments: Vec<Comment>,
}

impl Expense {
    /// Builds a validated expense with a fresh id. Participants are
    /// deduplicated by id, keeping first occurrence order.
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        paid_by: User,
        participants: Vec<User>,
        group_id: Option<String>,
    ) -> Result<Self, LedgerError> {
        if !is_valid_amount(amount) {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let mut unique: Vec<User> = Vec::with_capacity(participants.len());
        for user in participants {
            if !unique.contains(&user) {
                unique.push(user);
            }
        }
        if unique.is_empty() {
            return Err(LedgerError::EmptyParticipants);
        }

        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            amount,
            paid_by,
            participants: unique,
            date: Utc::now(),
            group_id,
            category: None,
            recurring: false,
            comments: Vec::new(),
        })
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    pub fn is_direct(&self) -> bool {
        self.group_id.is_none()
    }

    /// Amount and participant list are usable for aggregation.
    pub fn is_countable(&self) -> bool {
        is_valid_amount(self.amount) && !self.participants.is_empty()
    }

    /// Each participant's equal share, or `None` for an expense that must not
    /// be aggregated.
    pub fn share(&self) -> Option<f64> {
        if self.is_countable() {
            Some(self.amount / self.participants.len() as f64)
        } else {
            None
        }
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.paid_by.id == user_id || self.participants.iter().any(|p| p.id == user_id)
    }
}

pub(crate) fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}
