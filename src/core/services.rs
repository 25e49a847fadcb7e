use crate::config::CONFIG;
use crate::constants::{
    ADJUSTMENT_RECORDED, DIRECT_ADJUSTMENTS_COLLECTION, DIRECT_EXPENSES_COLLECTION, DIRECT_EXPENSE_ADDED,
    DIRECT_PAYMENT_RECORDED, EXPENSE_ADDED, EXPENSE_DELETED, EXPENSE_UPDATED, GROUP_CREATED, GROUPS_COLLECTION,
    MAX_NOTE_LENGTH, MAX_TITLE_LENGTH, MEMBER_ADDED, SETTLEMENT_EPSILON, SETTLEMENT_RECORDED,
    SIMPLIFY_DEBTS_TOGGLED,
};
use crate::core::balance::{Balances, compute_balances};
use crate::core::currency::{Currency, convert};
use crate::core::direct::PairwiseLedger;
use crate::core::errors::{FieldError, LedgerError};
use crate::core::models::{
    Activity, ActivityAction, Adjustment, AppLog, AdjustmentKind, Expense, ExpenseCategory, Group, Payment, User,
};
use crate::core::settlement::{Strategy, compute_settlement};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::records::{
    GroupRecord, activity_from_document, activity_to_document, adjustment_from_document, adjustment_to_document,
    expense_from_document, expense_to_document, group_from_document, group_to_document,
};
use crate::infrastructure::storage::{ChangeEvent, DocumentPath, DocumentStore, paths};
use chrono::{DateTime, Utc};
use futures::try_join;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::broadcast;
use uuid::Uuid;

/// The signed-in user on whose behalf service calls are made.
#[derive(Clone, Debug)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Session { user }
    }
}

/// Expense as submitted by a caller, before validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub paid_by: User,
    pub participants: Vec<User>,
    pub category: Option<ExpenseCategory>,
    pub recurring: bool,
    pub date: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(title: impl Into<String>, amount: f64, paid_by: User, participants: Vec<User>) -> Self {
        NewExpense {
            title: title.into(),
            amount,
            paid_by,
            participants,
            category: None,
            recurring: false,
            date: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupPosition {
    pub group_id: String,
    pub group_name: String,
    pub currency: Currency,
    pub balance: f64,
    /// `balance` in the summary currency.
    pub converted: f64,
}

/// Where a user stands across all their groups and friends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    pub currency: Currency,
    pub groups: Vec<GroupPosition>,
    pub direct: f64,
    pub total: f64,
}

pub struct LedgerService<L: LoggingService, S: DocumentStore> {
    storage: S,
    logging: L,
}

impl<L: LoggingService, S: DocumentStore> LedgerService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        info!("Initializing LedgerService");
        LedgerService { storage, logging }
    }

    pub async fn get_logs(&self) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs().await
    }

    // VALIDATION

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError::new(field, format!("Invalid {}", field), format!("{} cannot be empty", field)),
            ));
        }
        if value.chars().count() > max_length {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError::new(
                    field,
                    format!("{} Too Long", field),
                    format!("{} cannot exceed {} characters", field, max_length),
                ),
            ));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError::new(
                    field,
                    format!("Invalid {}", field),
                    format!("{} contains invalid characters", field),
                ),
            ));
        }
        Ok(())
    }

    fn validate_transfer_amount(&self, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() || amount.abs() < SETTLEMENT_EPSILON {
            return Err(LedgerError::InvalidAmount(amount));
        }
        Ok(())
    }

    fn validate_group_membership(&self, group: &Group, user_id: &str) -> Result<(), LedgerError> {
        if !group.is_member(user_id) {
            warn!("User {} is not a member of group {}", user_id, group.id);
            return Err(LedgerError::NotGroupMember(user_id.to_string()));
        }
        Ok(())
    }

    /// Swaps caller-supplied users for the group's own member records.
    fn resolve_members(&self, group: &Group, users: &[User]) -> Result<Vec<User>, LedgerError> {
        users
            .iter()
            .map(|u| {
                group
                    .member(&u.id)
                    .cloned()
                    .ok_or_else(|| LedgerError::NotGroupMember(u.id.clone()))
            })
            .collect()
    }

    fn build_expense(&self, new: NewExpense, group_id: Option<String>) -> Result<Expense, LedgerError> {
        self.validate_string_input("title", &new.title, MAX_TITLE_LENGTH)?;
        let mut expense = Expense::new(new.title, new.amount, new.paid_by, new.participants, group_id)?;
        expense.category = new.category;
        expense.recurring = new.recurring;
        if let Some(date) = new.date {
            expense.date = date;
        }
        Ok(expense)
    }

    async fn record_activity(
        &self,
        group_id: &str,
        actor_id: &str,
        action: ActivityAction,
        log_action: &str,
        details: Value,
    ) -> Result<(), LedgerError> {
        self.logging
            .log_action(log_action, details.clone(), Some(actor_id))
            .await?;
        let activity = Activity::new(group_id, actor_id, action, &details)?;
        let path = DocumentPath::new(paths::group_activity(group_id), activity.id.clone());
        self.storage.set(&path, activity_to_document(&activity)?).await
    }

    // GROUPS

    pub async fn create_group(
        &self,
        session: &Session,
        name: String,
        members: Vec<User>,
        currency: Option<Currency>,
    ) -> Result<Group, LedgerError> {
        info!("Creating group '{}' for user {}", name, session.user.id);
        self.validate_string_input("name", &name, MAX_TITLE_LENGTH)?;

        let mut unique = vec![session.user.clone()];
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            members: unique,
            expenses: Vec::new(),
            adjustments: Vec::new(),
            activity: Vec::new(),
            currency: currency.unwrap_or(CONFIG.default_currency),
            simplify_debts: CONFIG.simplify_debts_default,
        };
        let record = GroupRecord::from_group(&group, Utc::now());
        self.storage
            .set(&paths::group_path(&group.id), group_to_document(&record)?)
            .await?;
        debug!("Group created with ID: {}", group.id);

        self.record_activity(
            &group.id,
            &session.user.id,
            ActivityAction::GroupCreated,
            GROUP_CREATED,
            json!({ "group_id": group.id, "members": group.members.len() }),
        )
        .await?;
        Ok(group)
    }

    async fn load_group_record(&self, group_id: &str) -> Result<GroupRecord, LedgerError> {
        let document = self
            .storage
            .get(&paths::group_path(group_id))
            .await?
            .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
        group_from_document(document)
    }

    /// Fresh snapshot of a group and its full history. Documents that fail to
    /// decode are skipped so one bad record never hides the rest of the ledger.
    pub async fn load_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        let mut group = self.load_group_record(group_id).await?.into_group();
        let expenses_collection = paths::group_expenses(group_id);
        let adjustments_collection = paths::group_adjustments(group_id);
        let activity_collection = paths::group_activity(group_id);
        let (expenses, adjustments, activity) = try_join!(
            self.storage.list(&expenses_collection),
            self.storage.list(&adjustments_collection),
            self.storage.list(&activity_collection),
        )?;

        for (id, document) in expenses {
            match expense_from_document(document) {
                Ok(expense) => group.expenses.push(expense),
                Err(e) => warn!("Skipping expense {} in group {}: {}", id, group_id, e),
            }
        }
        for (id, document) in adjustments {
            match adjustment_from_document(document) {
                Ok(adjustment) => group.adjustments.push(adjustment),
                Err(e) => warn!("Skipping adjustment {} in group {}: {}", id, group_id, e),
            }
        }
        for (id, document) in activity {
            match activity_from_document(document) {
                Ok(activity) => group.activity.push(activity),
                Err(e) => warn!("Skipping activity {} in group {}: {}", id, group_id, e),
            }
        }

        group.expenses.sort_by(|a, b| a.date.cmp(&b.date));
        group.adjustments.sort_by(|a, b| a.date.cmp(&b.date));
        group.activity.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(group)
    }

    pub async fn add_member(&self, session: &Session, group_id: &str, user: User) -> Result<Group, LedgerError> {
        info!("User {} adding {} to group {}", session.user.id, user.id, group_id);
        let record = self.load_group_record(group_id).await?;
        let mut group = record.into_group();
        self.validate_group_membership(&group, &session.user.id)?;
        if group.is_member(&user.id) {
            warn!("User {} already in group {}", user.id, group_id);
            return Err(LedgerError::AlreadyGroupMember(user.id));
        }

        group.members.push(user.clone());
        let mut fields = Map::new();
        fields.insert("members".to_string(), serde_json::to_value(&group.members)?);
        self.storage.update_fields(&paths::group_path(group_id), fields).await?;

        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::MemberAdded,
            MEMBER_ADDED,
            json!({ "group_id": group_id, "user_id": user.id }),
        )
        .await?;
        self.load_group(group_id).await
    }

    pub async fn set_simplify_debts(&self, session: &Session, group_id: &str, enabled: bool) -> Result<(), LedgerError> {
        info!(
            "User {} setting simplify_debts={} on group {}",
            session.user.id, enabled, group_id
        );
        let group = self.load_group_record(group_id).await?.into_group();
        self.validate_group_membership(&group, &session.user.id)?;

        let mut fields = Map::new();
        fields.insert("simplify_debts".to_string(), Value::Bool(enabled));
        self.storage.update_fields(&paths::group_path(group_id), fields).await?;

        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::SimplifyDebtsToggled,
            SIMPLIFY_DEBTS_TOGGLED,
            json!({ "group_id": group_id, "enabled": enabled }),
        )
        .await
    }

    pub async fn group_activity(&self, group_id: &str) -> Result<Vec<Activity>, LedgerError> {
        Ok(self.load_group(group_id).await?.activity)
    }

    /// Changes to group header documents (members, simplify flag) across
    /// every group. Receivers filter on `event.path.id`.
    pub async fn subscribe_groups(&self) -> Result<broadcast::Receiver<ChangeEvent>, LedgerError> {
        self.storage.subscribe(GROUPS_COLLECTION).await
    }

    pub async fn subscribe_group_expenses(&self, group_id: &str) -> Result<broadcast::Receiver<ChangeEvent>, LedgerError> {
        self.storage.subscribe(&paths::group_expenses(group_id)).await
    }

    pub async fn subscribe_group_adjustments(
        &self,
        group_id: &str,
    ) -> Result<broadcast::Receiver<ChangeEvent>, LedgerError> {
        self.storage.subscribe(&paths::group_adjustments(group_id)).await
    }

    // GROUP EXPENSES

    fn validate_group_expense(&self, group: &Group, mut expense: Expense) -> Result<Expense, LedgerError> {
        expense.paid_by = group
            .member(&expense.paid_by.id)
            .cloned()
            .ok_or_else(|| LedgerError::NotGroupMember(expense.paid_by.id.clone()))?;
        expense.participants = self.resolve_members(group, &expense.participants)?;
        expense.group_id = Some(group.id.clone());
        Ok(expense)
    }

    pub async fn add_expense(&self, session: &Session, group_id: &str, new: NewExpense) -> Result<Expense, LedgerError> {
        info!(
            "Adding expense '{}' of {} to group {} by user {}",
            new.title, new.amount, group_id, session.user.id
        );
        let group = self.load_group_record(group_id).await?.into_group();
        self.validate_group_membership(&group, &session.user.id)?;

        let expense = self.build_expense(new, Some(group_id.to_string()))?;
        let expense = self.validate_group_expense(&group, expense)?;

        let path = DocumentPath::new(paths::group_expenses(group_id), expense.id.clone());
        self.storage.set(&path, expense_to_document(&expense)?).await?;
        debug!("Expense created with ID: {}", expense.id);

        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::ExpenseAdded,
            EXPENSE_ADDED,
            json!({ "group_id": group_id, "expense_id": expense.id, "amount": expense.amount }),
        )
        .await?;
        Ok(expense)
    }

    /// Replaces the stored expense with the same id as a whole.
    pub async fn update_expense(&self, session: &Session, group_id: &str, expense: Expense) -> Result<Expense, LedgerError> {
        info!(
            "Updating expense {} in group {} by user {}",
            expense.id, group_id, session.user.id
        );
        let group = self.load_group_record(group_id).await?.into_group();
        self.validate_group_membership(&group, &session.user.id)?;

        let path = DocumentPath::new(paths::group_expenses(group_id), expense.id.clone());
        if self.storage.get(&path).await?.is_none() {
            return Err(LedgerError::ExpenseNotFound(expense.id));
        }

        let new = NewExpense {
            title: expense.title.clone(),
            amount: expense.amount,
            paid_by: expense.paid_by.clone(),
            participants: expense.participants.clone(),
            category: expense.category,
            recurring: expense.recurring,
            date: Some(expense.date),
        };
        let mut replacement = self.build_expense(new, Some(group_id.to_string()))?;
        replacement.id = expense.id;
        replacement.comments = expense.comments;
        let replacement = self.validate_group_expense(&group, replacement)?;

        self.storage.set(&path, expense_to_document(&replacement)?).await?;
        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::ExpenseUpdated,
            EXPENSE_UPDATED,
            json!({ "group_id": group_id, "expense_id": replacement.id, "amount": replacement.amount }),
        )
        .await?;
        Ok(replacement)
    }

    pub async fn delete_expense(&self, session: &Session, group_id: &str, expense_id: &str) -> Result<(), LedgerError> {
        info!(
            "Deleting expense {} in group {} by user {}",
            expense_id, group_id, session.user.id
        );
        let group = self.load_group_record(group_id).await?.into_group();
        self.validate_group_membership(&group, &session.user.id)?;

        let path = DocumentPath::new(paths::group_expenses(group_id), expense_id);
        if !self.storage.delete(&path).await? {
            return Err(LedgerError::ExpenseNotFound(expense_id.to_string()));
        }
        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::ExpenseDeleted,
            EXPENSE_DELETED,
            json!({ "group_id": group_id, "expense_id": expense_id }),
        )
        .await
    }

    // ADJUSTMENTS & SETTLEMENT

    pub async fn record_adjustment(
        &self,
        session: &Session,
        group_id: &str,
        from_id: &str,
        to_id: &str,
        amount: f64,
        kind: AdjustmentKind,
        note: Option<String>,
    ) -> Result<Adjustment, LedgerError> {
        info!(
            "Recording {:?} adjustment of {} from {} to {} in group {}",
            kind, amount, from_id, to_id, group_id
        );
        let group = self.load_group_record(group_id).await?.into_group();
        self.validate_group_membership(&group, &session.user.id)?;
        if from_id == to_id {
            return Err(LedgerError::SelfAdjustment(from_id.to_string()));
        }
        self.validate_transfer_amount(amount)?;
        if let Some(ref note) = note {
            self.validate_string_input("note", note, MAX_NOTE_LENGTH)?;
        }
        let from = group
            .member(from_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotGroupMember(from_id.to_string()))?;
        let to = group
            .member(to_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotGroupMember(to_id.to_string()))?;

        let mut adjustment = Adjustment::new(from, to, amount, kind).in_group(group_id);
        adjustment.note = note;
        let path = DocumentPath::new(paths::group_adjustments(group_id), adjustment.id.clone());
        self.storage.set(&path, adjustment_to_document(&adjustment)?).await?;

        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::AdjustmentRecorded,
            ADJUSTMENT_RECORDED,
            json!({ "group_id": group_id, "adjustment_id": adjustment.id, "amount": amount }),
        )
        .await?;
        Ok(adjustment)
    }

    /// Recomputes every member's net balance from the stored history.
    pub async fn group_balances(&self, group_id: &str) -> Result<Balances, LedgerError> {
        let group = self.load_group(group_id).await?;
        Ok(compute_balances(&group.members, &group.expenses, &group.adjustments))
    }

    /// Payments that would settle the group, using the group's strategy.
    pub async fn suggested_settlement(&self, group_id: &str) -> Result<Vec<Payment>, LedgerError> {
        let group = self.load_group(group_id).await?;
        let balances = compute_balances(&group.members, &group.expenses, &group.adjustments);
        Ok(compute_settlement(
            &balances,
            Strategy::from_simplify_flag(group.simplify_debts),
        ))
    }

    /// Persists accepted payments as settlement adjustments.
    pub async fn settle_up(
        &self,
        session: &Session,
        group_id: &str,
        payments: &[Payment],
    ) -> Result<Vec<Adjustment>, LedgerError> {
        info!(
            "User {} settling {} payments in group {}",
            session.user.id,
            payments.len(),
            group_id
        );
        let group = self.load_group_record(group_id).await?.into_group();
        self.validate_group_membership(&group, &session.user.id)?;

        let mut adjustments = Vec::with_capacity(payments.len());
        for payment in payments {
            if payment.payer == payment.payee {
                return Err(LedgerError::SelfAdjustment(payment.payer.clone()));
            }
            self.validate_transfer_amount(payment.amount)?;
            let from = group
                .member(&payment.payer)
                .cloned()
                .ok_or_else(|| LedgerError::NotGroupMember(payment.payer.clone()))?;
            let to = group
                .member(&payment.payee)
                .cloned()
                .ok_or_else(|| LedgerError::NotGroupMember(payment.payee.clone()))?;
            adjustments.push(Adjustment::new(from, to, payment.amount, AdjustmentKind::Settlement).in_group(group_id));
        }

        // Writes are not atomic. They go in payment order so a failure leaves
        // a known prefix behind.
        for (written, adjustment) in adjustments.iter().enumerate() {
            let path = DocumentPath::new(paths::group_adjustments(group_id), adjustment.id.clone());
            let stored = match adjustment_to_document(adjustment) {
                Ok(document) => self.storage.set(&path, document).await,
                Err(e) => Err(e),
            };
            if let Err(e) = stored {
                error!(
                    "Settle-up in group {} stopped after {} of {} payments: {}",
                    group_id,
                    written,
                    adjustments.len(),
                    e
                );
                return Err(e);
            }
        }

        let total: f64 = adjustments.iter().map(|a| a.amount).sum();
        self.record_activity(
            group_id,
            &session.user.id,
            ActivityAction::SettlementRecorded,
            SETTLEMENT_RECORDED,
            json!({ "group_id": group_id, "payments": adjustments.len(), "total": total }),
        )
        .await?;
        Ok(adjustments)
    }

    // DIRECT (FRIEND) LEDGER

    pub async fn add_direct_expense(&self, session: &Session, new: NewExpense) -> Result<Expense, LedgerError> {
        info!(
            "Adding direct expense '{}' of {} by user {}",
            new.title, new.amount, session.user.id
        );
        let expense = self.build_expense(new, None)?;
        if expense.participants.len() != 2 || !expense.participants.contains(&expense.paid_by) {
            warn!(
                "Direct expense rejected: {} participants, payer {}",
                expense.participants.len(),
                expense.paid_by.id
            );
            return Err(LedgerError::InvalidDirectParticipants(expense.participants.len()));
        }
        if !expense.involves(&session.user.id) {
            return Err(LedgerError::NotParticipant(session.user.id.clone()));
        }

        self.storage
            .set(&paths::direct_expense_path(&expense.id), expense_to_document(&expense)?)
            .await?;
        self.logging
            .log_action(
                DIRECT_EXPENSE_ADDED,
                json!({ "expense_id": expense.id, "amount": expense.amount }),
                Some(&session.user.id),
            )
            .await?;
        Ok(expense)
    }

    pub async fn record_direct_payment(
        &self,
        session: &Session,
        from: User,
        to: User,
        amount: f64,
        kind: AdjustmentKind,
    ) -> Result<Adjustment, LedgerError> {
        info!("Recording direct {:?} of {} from {} to {}", kind, amount, from.id, to.id);
        if from == to {
            return Err(LedgerError::SelfAdjustment(from.id));
        }
        if session.user != from && session.user != to {
            return Err(LedgerError::NotParticipant(session.user.id.clone()));
        }
        self.validate_transfer_amount(amount)?;

        let adjustment = Adjustment::new(from, to, amount, kind);
        self.storage
            .set(
                &paths::direct_adjustment_path(&adjustment.id),
                adjustment_to_document(&adjustment)?,
            )
            .await?;
        self.logging
            .log_action(
                DIRECT_PAYMENT_RECORDED,
                json!({ "adjustment_id": adjustment.id, "amount": amount }),
                Some(&session.user.id),
            )
            .await?;
        Ok(adjustment)
    }

    /// Pairwise ledger over every direct expense and payment involving `user_id`.
    pub async fn direct_ledger(&self, user_id: &str) -> Result<PairwiseLedger, LedgerError> {
        let mut expenses = Vec::new();
        for (id, document) in self.storage.list(DIRECT_EXPENSES_COLLECTION).await? {
            match expense_from_document(document) {
                Ok(expense) if expense.involves(user_id) => expenses.push(expense),
                Ok(_) => {}
                Err(e) => warn!("Skipping direct expense {}: {}", id, e),
            }
        }
        let mut adjustments = Vec::new();
        for (id, document) in self.storage.list(DIRECT_ADJUSTMENTS_COLLECTION).await? {
            match adjustment_from_document(document) {
                Ok(adj) if adj.from.id == user_id || adj.to.id == user_id => adjustments.push(adj),
                Ok(_) => {}
                Err(e) => warn!("Skipping direct adjustment {}: {}", id, e),
            }
        }
        expenses.sort_by(|a, b| a.date.cmp(&b.date));
        adjustments.sort_by(|a, b| a.date.cmp(&b.date));
        debug!(
            "Direct ledger for {}: {} expenses, {} adjustments",
            user_id,
            expenses.len(),
            adjustments.len()
        );
        Ok(PairwiseLedger::from_records(&expenses, &adjustments))
    }

    /// Records the one payment that clears the session user and `friend`.
    /// `None` when they are already even.
    pub async fn settle_friend(&self, session: &Session, friend: &User) -> Result<Option<Adjustment>, LedgerError> {
        let ledger = self.direct_ledger(&session.user.id).await?;
        let Some(payment) = ledger.settlement_between(&session.user.id, &friend.id) else {
            debug!("{} and {} are already settled", session.user.id, friend.id);
            return Ok(None);
        };
        let (from, to) = if payment.payer == session.user.id {
            (session.user.clone(), friend.clone())
        } else {
            (friend.clone(), session.user.clone())
        };
        let adjustment = self
            .record_direct_payment(session, from, to, payment.amount, AdjustmentKind::Settlement)
            .await?;
        Ok(Some(adjustment))
    }

    // SUMMARY

    /// Net position of `user_id` in every group they belong to and across
    /// friends, converted to `currency`. Direct expenses carry no currency and
    /// are read as `CONFIG.default_currency`.
    pub async fn user_summary(&self, user_id: &str, currency: Currency) -> Result<UserSummary, LedgerError> {
        let mut groups = Vec::new();
        for (id, document) in self.storage.list(GROUPS_COLLECTION).await? {
            let record = match group_from_document(document) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping group {}: {}", id, e);
                    continue;
                }
            };
            if !record.members.iter().any(|m| m.id == user_id) {
                continue;
            }
            let group = self.load_group(&record.id).await?;
            let balance = compute_balances(&group.members, &group.expenses, &group.adjustments)
                .get(user_id)
                .unwrap_or(0.0);
            groups.push(GroupPosition {
                group_id: group.id,
                group_name: group.name,
                currency: group.currency,
                balance,
                converted: convert(balance, group.currency, currency),
            });
        }

        let direct = convert(
            self.direct_ledger(user_id).await?.net_position(user_id),
            CONFIG.default_currency,
            currency,
        );
        let total = groups.iter().map(|g| g.converted).sum::<f64>() + direct;
        Ok(UserSummary {
            user_id: user_id.to_string(),
            currency,
            groups,
            direct,
            total,
        })
    }
}
