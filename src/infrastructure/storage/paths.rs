use super::DocumentPath;
use crate::constants::{DIRECT_ADJUSTMENTS_COLLECTION, DIRECT_EXPENSES_COLLECTION, GROUPS_COLLECTION};

pub fn group_path(group_id: &str) -> DocumentPath {
    DocumentPath::new(GROUPS_COLLECTION, group_id)
}

pub fn group_expenses(group_id: &str) -> String {
    format!("{}/{}/expenses", GROUPS_COLLECTION, group_id)
}

pub fn group_adjustments(group_id: &str) -> String {
    format!("{}/{}/adjustments", GROUPS_COLLECTION, group_id)
}

pub fn group_activity(group_id: &str) -> String {
    format!("{}/{}/activity", GROUPS_COLLECTION, group_id)
}

pub fn direct_expense_path(expense_id: &str) -> DocumentPath {
    DocumentPath::new(DIRECT_EXPENSES_COLLECTION, expense_id)
}

pub fn direct_adjustment_path(adjustment_id: &str) -> DocumentPath {
    DocumentPath::new(DIRECT_ADJUSTMENTS_COLLECTION, adjustment_id)
}
