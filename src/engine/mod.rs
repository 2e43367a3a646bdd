//! The scheduling heart: decides which rules are due, materializes
//! transactions from them, and advances their due dates.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::{
    domain::{
        RecurrenceRule, RuleDraft, Schedule, Transaction, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION,
    },
    errors::EngineError,
    storage::{RuleStore, TransactionSink},
};

/// Reads the rule store, applies due rules, and writes the results. Holds
/// its store handles explicitly; there is no ambient connection state.
pub struct SchedulerEngine {
    rules: Box<dyn RuleStore>,
    transactions: Box<dyn TransactionSink>,
}

impl SchedulerEngine {
    pub fn new(rules: Box<dyn RuleStore>, transactions: Box<dyn TransactionSink>) -> Self {
        Self {
            rules,
            transactions,
        }
    }

    /// Applies every rule due on or before `today` and returns the
    /// transactions materialized in this pass, in storage order.
    ///
    /// Each rule advances at most one period per call, chained from its
    /// previous due date, so a rule several periods behind catches up
    /// across repeated calls. A malformed or failing rule is skipped and
    /// logged; only failure to enumerate the rules surfaces as an error.
    pub fn apply_due(&self, today: NaiveDate) -> Result<Vec<Transaction>, EngineError> {
        let mut applied = Vec::new();
        for rule in self.rules.list_rules()? {
            let Some(schedule) = rule.schedule() else {
                tracing::debug!(rule = %rule.id, "skipping rule without a valid schedule");
                continue;
            };
            if today < schedule.next_due {
                continue;
            }
            match self.apply_rule(&rule, schedule) {
                Ok(transaction) => applied.push(transaction),
                Err(err) => {
                    tracing::warn!(
                        rule = %rule.id,
                        error = %err,
                        "transaction insert failed; rule stays due and retries next pass"
                    );
                }
            }
        }
        Ok(applied)
    }

    /// Inserts a new rule and immediately runs one apply pass, so a start
    /// date that is already due (including today) materializes without
    /// waiting for the next `apply_recurring` request. Returns the
    /// transactions that pass applied.
    pub fn add_rule(
        &self,
        draft: RuleDraft,
        today: NaiveDate,
    ) -> Result<Vec<Transaction>, EngineError> {
        let rule = draft.into_rule();
        self.rules.insert_rule(&rule)?;
        tracing::info!(rule = %rule.id, "recurring rule added");
        self.apply_due(today)
    }

    fn apply_rule(
        &self,
        rule: &RecurrenceRule,
        schedule: Schedule,
    ) -> Result<Transaction, EngineError> {
        let kind = rule.resolved_kind();
        let amount = kind.normalize(rule.amount);
        let transaction = Transaction {
            id: Uuid::new_v4(),
            date: schedule.next_due,
            kind,
            description: rule
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            category: rule
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            amount,
        };
        self.transactions.insert_transaction(&transaction)?;

        let next_due = schedule.next_due + Duration::days(schedule.frequency.delta_days());
        if let Err(err) = self.rules.advance_next_due(rule.id, next_due) {
            // The transaction above is already committed. Leaving next_due
            // behind means the next pass can apply this period again.
            tracing::error!(
                rule = %rule.id,
                due = %schedule.next_due,
                error = %err,
                "failed to advance next_due after inserting transaction; \
                 duplicate application possible on retry"
            );
        }
        Ok(transaction)
    }
}
