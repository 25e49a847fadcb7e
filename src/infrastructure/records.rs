//! Typed documents exchanged with the `DocumentStore`.
//!
//! Every entity goes through one `*_to_document` / `*_from_document` pair so
//! the engine never touches loosely-typed payloads.

use crate::core::currency::Currency;
use crate::core::errors::LedgerError;
use crate::core::models::{Activity, Adjustment, Expense, Group, User};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Group header document. Expenses, adjustments and activity live in
/// sub-collections under the group path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub members: Vec<User>,
    pub currency: Currency,
    pub simplify_debts: bool,
    pub created_at: DateTime<Utc>,
}

impl GroupRecord {
    pub fn from_group(group: &Group, created_at: DateTime<Utc>) -> Self {
        GroupRecord {
            id: group.id.clone(),
            name: group.name.clone(),
            members: group.members.clone(),
            currency: group.currency,
            simplify_debts: group.simplify_debts,
            created_at,
        }
    }

    /// Header only; the caller fills in the sub-collections.
    pub fn into_group(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            members: self.members,
            expenses: Vec::new(),
            adjustments: Vec::new(),
            activity: Vec::new(),
            currency: self.currency,
            simplify_debts: self.simplify_debts,
        }
    }
}

fn encode<T: Serialize>(entity: &T, kind: &str) -> Result<Value, LedgerError> {
    serde_json::to_value(entity).map_err(|e| LedgerError::Serialization(format!("Failed to encode {}: {}", kind, e)))
}

fn decode<T: DeserializeOwned>(document: Value, kind: &str) -> Result<T, LedgerError> {
    serde_json::from_value(document).map_err(|e| LedgerError::Serialization(format!("Failed to decode {}: {}", kind, e)))
}

pub fn group_to_document(record: &GroupRecord) -> Result<Value, LedgerError> {
    encode(record, "group")
}

pub fn group_from_document(document: Value) -> Result<GroupRecord, LedgerError> {
    decode(document, "group")
}

pub fn expense_to_document(expense: &Expense) -> Result<Value, LedgerError> {
    encode(expense, "expense")
}

pub fn expense_from_document(document: Value) -> Result<Expense, LedgerError> {
    decode(document, "expense")
}

pub fn adjustment_to_document(adjustment: &Adjustment) -> Result<Value, LedgerError> {
    encode(adjustment, "adjustment")
}

pub fn adjustment_from_document(document: Value) -> Result<Adjustment, LedgerError> {
    decode(document, "adjustment")
}

pub fn activity_to_document(activity: &Activity) -> Result<Value, LedgerError> {
    encode(activity, "activity")
}

pub fn activity_from_document(document: Value) -> Result<Activity, LedgerError> {
    decode(document, "activity")
}
