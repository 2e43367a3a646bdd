pub mod json_backend;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{RecurrenceRule, Transaction},
    errors::EngineError,
};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Persisted collection of recurrence rules.
///
/// The scheduler is the only writer of `next_due`; everything else on a
/// rule document belongs to the collaborator that created it. Rules are
/// never deleted through this seam.
pub trait RuleStore: Send + Sync {
    /// Returns every rule in storage order.
    fn list_rules(&self) -> Result<Vec<RecurrenceRule>>;
    fn insert_rule(&self, rule: &RecurrenceRule) -> Result<()>;
    /// Moves the rule's due date forward after an application.
    fn advance_next_due(&self, id: Uuid, next_due: NaiveDate) -> Result<()>;
}

/// Persisted collection of materialized transactions.
pub trait TransactionSink: Send + Sync {
    fn insert_transaction(&self, transaction: &Transaction) -> Result<()>;
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
}

pub use json_backend::JsonStore;
