use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// Expense with given ID not found
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    /// User is not a member of the group
    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    /// User is already a member of the group
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    /// Acting user is neither side of a direct expense or payment
    #[error("User {0} is not part of this expense")]
    NotParticipant(String),

    /// Expense was submitted without anyone to share it
    #[error("Expense must have at least one participant")]
    EmptyParticipants,

    /// Amount is negative, NaN or infinite
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Direct expenses need exactly two distinct participants, one of them the payer
    #[error("Direct expense needs exactly two participants including the payer, got {0}")]
    InvalidDirectParticipants(usize),

    /// Cannot record a transfer from a user to themselves
    #[error("Cannot record an adjustment from {0} to themselves")]
    SelfAdjustment(String),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
