pub mod activity;
pub mod adjustment;
pub mod expense;
pub mod group;
pub mod payment;
pub mod user;

pub use activity::{Activity, ActivityAction, AppLog};
pub use adjustment::{Adjustment, AdjustmentKind};
pub use expense::{Comment, Expense, ExpenseCategory};
pub use group::Group;
pub use payment::Payment;
pub use user::{User, UserId};
