/// Balances whose magnitude is below this are treated as settled.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// Tolerance for the sum-of-balances check.
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_NOTE_LENGTH: usize = 500;

// Store collections
pub const GROUPS_COLLECTION: &str = "groups";
pub const DIRECT_EXPENSES_COLLECTION: &str = "direct_expenses";
pub const DIRECT_ADJUSTMENTS_COLLECTION: &str = "direct_adjustments";

// Application log actions
pub const GROUP_CREATED: &str = "group_created";
pub const MEMBER_ADDED: &str = "member_added";
pub const SIMPLIFY_DEBTS_TOGGLED: &str = "simplify_debts_toggled";
pub const EXPENSE_ADDED: &str = "expense_added";
pub const EXPENSE_UPDATED: &str = "expense_updated";
pub const EXPENSE_DELETED: &str = "expense_deleted";
pub const ADJUSTMENT_RECORDED: &str = "adjustment_recorded";
pub const SETTLEMENT_RECORDED: &str = "settlement_recorded";
pub const DIRECT_EXPENSE_ADDED: &str = "direct_expense_added";
pub const DIRECT_PAYMENT_RECORDED: &str = "direct_payment_recorded";
