use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Payment accepted from a suggested settlement.
    Settlement,
    /// Debt written off by the creditor.
    Forgiveness,
    Manual,
}

/// `from` transferred `amount` to `to`. Negative amounts reverse direction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: String,
    pub from: User,
    pub to: User,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub group_id: Option<String>,
    pub kind: AdjustmentKind,
    pub note: Option<String>,
}

impl Adjustment {
    pub fn new(from: User, to: User, amount: f64, kind: AdjustmentKind) -> Self {
        Adjustment {
            id: Uuid::new_v4().to_string(),
            from,
            to,
            amount,
            date: Utc::now(),
            group_id: None,
            kind,
            note: None,
        }
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
