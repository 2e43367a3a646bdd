use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::TransactionKind;

pub const DEFAULT_DESCRIPTION: &str = "no description";
pub const DEFAULT_CATEGORY: &str = "uncategorized";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How often a rule fires, with its fixed advancement in days.
///
/// Monthly advances a flat 30 days rather than a calendar month, so a rule
/// catching up over a long gap drifts against the wall calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "bi-weekly")]
    BiWeekly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl Frequency {
    pub fn delta_days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::BiWeekly => 14,
            Self::Monthly => 30,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "bi-weekly" => Some(Self::BiWeekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::BiWeekly => "bi-weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Recurrence fields exactly as persisted.
///
/// Both are loosely typed strings: external collaborators write these
/// documents too, and a missing or unparseable value must leave the rule
/// inert rather than poison the whole collection on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<String>,
}

impl Recurrence {
    pub fn new(frequency: Frequency, next_due: NaiveDate) -> Self {
        Self {
            frequency: Some(frequency.as_str().to_string()),
            next_due: Some(format_date(next_due)),
        }
    }
}

/// Typed view of a rule's recurrence once both fields validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub frequency: Frequency,
    pub next_due: NaiveDate,
}

/// A persisted recurrence definition that produces transactions on a
/// schedule. The scheduler is the only writer of `recurrence.next_due`;
/// every other field belongs to the collaborator that created the rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl RecurrenceRule {
    /// Validates the persisted recurrence fields. `None` marks the rule
    /// inert: it is never applied and never mutated until its owner fixes
    /// the document.
    pub fn schedule(&self) -> Option<Schedule> {
        let frequency = Frequency::parse(self.recurrence.frequency.as_deref()?)?;
        let next_due = parse_date(self.recurrence.next_due.as_deref()?)?;
        Some(Schedule {
            frequency,
            next_due,
        })
    }

    /// The rule's explicit type, or the sign-based fallback when absent.
    pub fn resolved_kind(&self) -> TransactionKind {
        self.kind
            .clone()
            .unwrap_or_else(|| TransactionKind::infer(self.amount))
    }
}

/// A rule as accepted at the ingress boundary: identity not yet assigned,
/// recurrence already typed by protocol validation.
#[derive(Debug, Clone)]
pub struct RuleDraft {
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: f64,
    pub kind: Option<TransactionKind>,
    pub frequency: Frequency,
    pub next_due: NaiveDate,
}

impl RuleDraft {
    pub fn into_rule(self) -> RecurrenceRule {
        RecurrenceRule {
            id: Uuid::new_v4(),
            description: self.description,
            category: self.category,
            amount: self.amount,
            kind: self.kind,
            recurrence: Recurrence::new(self.frequency, self.next_due),
        }
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_with_recurrence(recurrence: Recurrence) -> RecurrenceRule {
        RecurrenceRule {
            id: Uuid::new_v4(),
            description: None,
            category: None,
            amount: 10.0,
            kind: None,
            recurrence,
        }
    }

    #[test]
    fn frequency_table_matches_wire_strings() {
        assert_eq!(Frequency::parse("daily"), Some(Frequency::Daily));
        assert_eq!(Frequency::parse("bi-weekly"), Some(Frequency::BiWeekly));
        assert_eq!(Frequency::parse("monthly"), Some(Frequency::Monthly));
        assert_eq!(Frequency::parse("weekly"), None);
        assert_eq!(Frequency::Daily.delta_days(), 1);
        assert_eq!(Frequency::BiWeekly.delta_days(), 14);
        assert_eq!(Frequency::Monthly.delta_days(), 30);
    }

    #[test]
    fn schedule_requires_both_fields() {
        let missing_frequency = rule_with_recurrence(Recurrence {
            frequency: None,
            next_due: Some("2024-01-01".into()),
        });
        assert!(missing_frequency.schedule().is_none());

        let missing_date = rule_with_recurrence(Recurrence {
            frequency: Some("daily".into()),
            next_due: None,
        });
        assert!(missing_date.schedule().is_none());
    }

    #[test]
    fn schedule_rejects_unparseable_values() {
        let bad_date = rule_with_recurrence(Recurrence {
            frequency: Some("daily".into()),
            next_due: Some("01/02/2024".into()),
        });
        assert!(bad_date.schedule().is_none());

        let bad_frequency = rule_with_recurrence(Recurrence {
            frequency: Some("fortnightly".into()),
            next_due: Some("2024-01-01".into()),
        });
        assert!(bad_frequency.schedule().is_none());
    }

    #[test]
    fn schedule_parses_valid_recurrence() {
        let rule = rule_with_recurrence(Recurrence::new(
            Frequency::BiWeekly,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ));
        let schedule = rule.schedule().expect("valid schedule");
        assert_eq!(schedule.frequency, Frequency::BiWeekly);
        assert_eq!(
            schedule.next_due,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn stored_rule_tolerates_missing_fields() {
        let raw = r#"{"id": "4a3c9c35-9f35-4b62-9c2e-5a6b0c8df001"}"#;
        let rule: RecurrenceRule = serde_json::from_str(raw).expect("tolerant deserialize");
        assert_eq!(rule.amount, 0.0);
        assert!(rule.schedule().is_none());
    }

    #[test]
    fn draft_becomes_rule_with_typed_recurrence() {
        let draft = RuleDraft {
            description: Some("gym".into()),
            category: Some("health".into()),
            amount: 30.0,
            kind: Some(TransactionKind::Expense),
            frequency: Frequency::Monthly,
            next_due: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let rule = draft.into_rule();
        assert_eq!(rule.recurrence.frequency.as_deref(), Some("monthly"));
        assert_eq!(rule.recurrence.next_due.as_deref(), Some("2024-06-01"));
        assert!(rule.schedule().is_some());
    }
}
