use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{format_date, RecurrenceRule, Transaction},
    errors::EngineError,
    utils::{ensure_dir, write_atomic},
};

use super::{Result, RuleStore, TransactionSink};

const RULES_FILE: &str = "rules.json";
const TRANSACTIONS_FILE: &str = "transactions.json";

/// File-backed document store holding both collections under one data
/// directory: `rules.json` and `transactions.json`, each a JSON array of
/// documents keyed by id.
///
/// The two files are written independently, one operation at a time, which
/// preserves the ordering the engine's failure semantics depend on: a
/// transaction can land without the matching due-date advance.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    rules_file: PathBuf,
    transactions_file: PathBuf,
}

impl JsonStore {
    /// Opens (creating if necessary) the data directory. Failure here is a
    /// connectivity problem: the store location cannot be used at all.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root).map_err(|err| {
            EngineError::Connectivity(format!("{}: {err}", root.display()))
        })?;
        let rules_file = root.join(RULES_FILE);
        let transactions_file = root.join(TRANSACTIONS_FILE);
        Ok(Self {
            root,
            rules_file,
            transactions_file,
        })
    }

    /// Startup check: both collections must be readable before the service
    /// begins accepting requests.
    pub fn ping(&self) -> Result<()> {
        self.read_rules().map_err(|err| {
            EngineError::Connectivity(format!("{}: {err}", self.rules_file.display()))
        })?;
        self.read_transactions().map_err(|err| {
            EngineError::Connectivity(format!("{}: {err}", self.transactions_file.display()))
        })?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn read_rules(&self) -> Result<Vec<RecurrenceRule>> {
        read_collection(&self.rules_file)
    }

    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        read_collection(&self.transactions_file)
    }
}

impl RuleStore for JsonStore {
    fn list_rules(&self) -> Result<Vec<RecurrenceRule>> {
        self.read_rules()
    }

    fn insert_rule(&self, rule: &RecurrenceRule) -> Result<()> {
        let mut rules = self.read_rules()?;
        rules.push(rule.clone());
        write_collection(&self.rules_file, &rules)
    }

    fn advance_next_due(&self, id: Uuid, next_due: NaiveDate) -> Result<()> {
        let mut rules = self.read_rules()?;
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or_else(|| EngineError::Storage(format!("rule {id} not found")))?;
        rule.recurrence.next_due = Some(format_date(next_due));
        write_collection(&self.rules_file, &rules)
    }
}

impl TransactionSink for JsonStore {
    fn insert_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_transactions()?;
        transactions.push(transaction.clone());
        write_collection(&self.transactions_file, &transactions)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.read_transactions()
    }
}

fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&data)?)
}

fn write_collection<T: serde::Serialize>(path: &Path, documents: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(documents)?;
    write_atomic(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, Recurrence, TransactionKind};
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::open(temp.path().join("data")).expect("open store");
        (store, temp)
    }

    fn sample_rule() -> RecurrenceRule {
        RecurrenceRule {
            id: Uuid::new_v4(),
            description: Some("rent".into()),
            category: Some("housing".into()),
            amount: 1200.0,
            kind: Some(TransactionKind::Expense),
            recurrence: Recurrence::new(
                Frequency::Monthly,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ),
        }
    }

    #[test]
    fn missing_files_read_as_empty_collections() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.list_rules().expect("list rules").is_empty());
        assert!(store
            .list_transactions()
            .expect("list transactions")
            .is_empty());
        store.ping().expect("ping fresh store");
    }

    #[test]
    fn insert_and_list_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        let rule = sample_rule();
        store.insert_rule(&rule).expect("insert rule");
        let rules = store.list_rules().expect("list rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, rule.id);
        assert_eq!(rules[0].description.as_deref(), Some("rent"));
    }

    #[test]
    fn advance_next_due_touches_only_the_due_date() {
        let (store, _guard) = store_with_temp_dir();
        let rule = sample_rule();
        store.insert_rule(&rule).expect("insert rule");

        let advanced = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        store
            .advance_next_due(rule.id, advanced)
            .expect("advance due date");

        let stored = &store.list_rules().expect("list rules")[0];
        assert_eq!(stored.recurrence.next_due.as_deref(), Some("2024-01-31"));
        assert_eq!(stored.recurrence.frequency.as_deref(), Some("monthly"));
        assert_eq!(stored.amount, 1200.0);
    }

    #[test]
    fn advance_next_due_fails_for_unknown_rule() {
        let (store, _guard) = store_with_temp_dir();
        let err = store
            .advance_next_due(Uuid::new_v4(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .expect_err("unknown rule must fail");
        assert!(matches!(err, EngineError::Storage(_)), "got: {err:?}");
    }

    #[test]
    fn ping_fails_on_corrupt_collection() {
        let (store, _guard) = store_with_temp_dir();
        fs::write(store.base_dir().join(RULES_FILE), "{ not json").expect("write corrupt file");
        let err = store.ping().expect_err("corrupt collection must fail ping");
        assert!(matches!(err, EngineError::Connectivity(_)), "got: {err:?}");
    }
}
