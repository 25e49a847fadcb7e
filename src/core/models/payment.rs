use super::user::UserId;
use serde::{Deserialize, Serialize};

/// A settlement step: `payer` should send `amount` to `payee`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub payer: UserId,
    pub payee: UserId,
    pub amount: f64,
}

impl Payment {
    pub fn new(payer: impl Into<String>, payee: impl Into<String>, amount: f64) -> Self {
        Payment {
            payer: payer.into(),
            payee: payee.into(),
            amount,
        }
    }
}
