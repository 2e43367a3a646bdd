use std::sync::Mutex;

use budgetwise_core::{engine::SchedulerEngine, storage::JsonStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated store backed by a unique directory for each test.
pub fn setup_store() -> JsonStore {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonStore::open(temp.path().join("data")).expect("open json store");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    store
}

/// Engine wired to two handles on the same store, as the service wires it.
pub fn engine_on(store: &JsonStore) -> SchedulerEngine {
    SchedulerEngine::new(Box::new(store.clone()), Box::new(store.clone()))
}
