pub mod rule;
pub mod transaction;

pub use rule::{
    format_date, parse_date, Frequency, Recurrence, RecurrenceRule, RuleDraft, Schedule,
    DEFAULT_CATEGORY, DEFAULT_DESCRIPTION,
};
pub use transaction::{Transaction, TransactionKind};
