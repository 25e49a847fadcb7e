use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    GroupCreated,
    MemberAdded,
    SimplifyDebtsToggled,
    ExpenseAdded,
    ExpenseUpdated,
    ExpenseDeleted,
    AdjustmentRecorded,
    SettlementRecorded,
}

/// One line of a group's history feed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub group_id: String,
    pub actor_id: String,
    pub action: ActivityAction,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    // Create activity entry with structured JSON details
    pub fn new<T: Serialize>(
        group_id: &str,
        actor_id: &str,
        action: ActivityAction,
        details: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Activity {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            actor_id: actor_id.to_string(),
            action,
            details: serde_json::to_value(details)?,
            timestamp: Utc::now(),
        })
    }
}

/// Process-wide application log record, kept by a `LoggingService`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppLog {
    pub id: String,
    pub action: String,
    pub user_id: Option<String>,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
