use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a transaction.
///
/// Serialized as a bare string: `income`, `expense`, or whatever custom
/// label an external collaborator has written (`savings` is common).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    Income,
    Expense,
    Custom(String),
}

impl TransactionKind {
    /// Fallback used when a rule carries no explicit type: a positive
    /// amount is income, everything else an expense.
    pub fn infer(amount: f64) -> Self {
        if amount > 0.0 {
            Self::Income
        } else {
            Self::Expense
        }
    }

    /// Forces the amount sign to match the kind. Expenses are stored
    /// negative, income positive; custom kinds keep the amount untouched.
    pub fn normalize(&self, amount: f64) -> f64 {
        match self {
            Self::Expense if amount > 0.0 => -amount.abs(),
            Self::Income if amount < 0.0 => amount.abs(),
            _ => amount,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Custom(label) => label,
        }
    }
}

impl From<String> for TransactionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "income" => Self::Income,
            "expense" => Self::Expense,
            _ => Self::Custom(value),
        }
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A concrete transaction materialized from a recurrence rule.
///
/// The engine never mutates a transaction after insertion. `date` is the
/// due date the rule fired on (not the processing date) and serializes as
/// an ISO `YYYY-MM-DD` string so the menu application and exporters can
/// read the collection directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub category: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_inferred_from_amount_sign() {
        assert_eq!(TransactionKind::infer(50.0), TransactionKind::Income);
        assert_eq!(TransactionKind::infer(-20.0), TransactionKind::Expense);
        assert_eq!(TransactionKind::infer(0.0), TransactionKind::Expense);
    }

    #[test]
    fn normalize_flips_mismatched_signs() {
        assert_eq!(TransactionKind::Expense.normalize(20.0), -20.0);
        assert_eq!(TransactionKind::Expense.normalize(-20.0), -20.0);
        assert_eq!(TransactionKind::Income.normalize(-50.0), 50.0);
        assert_eq!(TransactionKind::Income.normalize(50.0), 50.0);
    }

    #[test]
    fn custom_kinds_are_not_normalized() {
        let savings = TransactionKind::Custom("savings".into());
        assert_eq!(savings.normalize(-75.0), -75.0);
        assert_eq!(savings.normalize(75.0), 75.0);
    }

    #[test]
    fn kind_roundtrips_through_strings() {
        let parsed = TransactionKind::from("savings".to_string());
        assert_eq!(parsed, TransactionKind::Custom("savings".into()));
        assert_eq!(String::from(parsed), "savings");
        assert_eq!(
            TransactionKind::from("income".to_string()),
            TransactionKind::Income
        );
    }

    #[test]
    fn date_serializes_as_iso_string() {
        let txn = Transaction {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            kind: TransactionKind::Expense,
            description: "rent".into(),
            category: "housing".into(),
            amount: -1200.0,
        };
        let value = serde_json::to_value(&txn).expect("serialize transaction");
        assert_eq!(value["date"], "2024-01-31");
        assert_eq!(value["type"], "expense");
    }
}
