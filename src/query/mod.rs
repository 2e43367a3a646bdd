//! Read-side helpers over the transaction collection.
//!
//! The menu front end filters by month, by type, and by id; the savings
//! reporter totals the custom `savings` kind. All of them read the same
//! persisted collection this crate owns, so the filters live here as pure
//! functions over a loaded slice.

use uuid::Uuid;

use crate::domain::{Transaction, TransactionKind};

pub const SAVINGS_KIND: &str = "savings";

const MONTH_FORMAT: &str = "%Y-%m";

/// Criteria for narrowing a transaction listing. Empty criteria match
/// everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Calendar month in `YYYY-MM` form.
    pub month: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    pub fn by_month(month: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            ..Self::default()
        }
    }

    pub fn by_kind(kind: TransactionKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(month) = &self.month {
            if transaction.date.format(MONTH_FORMAT).to_string() != *month {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if transaction.kind != *kind {
                return false;
            }
        }
        true
    }
}

pub fn filter<'a>(
    transactions: &'a [Transaction],
    criteria: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|txn| criteria.matches(txn))
        .collect()
}

pub fn find_by_id(transactions: &[Transaction], id: Uuid) -> Option<&Transaction> {
    transactions.iter().find(|txn| txn.id == id)
}

/// Total of all transactions carrying the custom `savings` kind.
pub fn savings_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|txn| matches!(&txn.kind, TransactionKind::Custom(label) if label == SAVINGS_KIND))
        .map(|txn| txn.amount)
        .sum()
}
