/*!
 * Integration tests for SQLite-backed persistence
 */

use anyhow::Result;
use std::sync::Arc;

use linguaflow::persistence::HISTORY_KEY;
use linguaflow::storage::{DatabaseConnection, KeyValueStore, SqliteStore};
use linguaflow::{PersistenceStore, ThemePreference};

fn open_store(path: &std::path::Path) -> Result<PersistenceStore> {
    Ok(PersistenceStore::new(Arc::new(SqliteStore::open(path)?)))
}

/// History, favorites and theme survive closing and reopening the database
#[test]
fn test_persistence_withReopenedDatabase_shouldKeepState() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("linguaflow.db");

    {
        let store = open_store(&path)?;
        let entry = store.record_translation("hello", "merhaba", "tr");
        store.record_translation("thanks", "teşekkürler", "tr");
        assert!(store.promote_to_favorite_by_id(&entry.id));
        store.set_theme(ThemePreference::Dark);
    }

    let store = open_store(&path)?;
    let history = store.list_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].input, "thanks");
    assert_eq!(store.list_favorites()[0].input, "hello");
    assert_eq!(store.theme(), ThemePreference::Dark);
    Ok(())
}

#[test]
fn test_clear_history_withSqliteBackend_shouldRemoveKey() -> Result<()> {
    let kv = Arc::new(SqliteStore::new(DatabaseConnection::new_in_memory()?));
    let store = PersistenceStore::new(kv.clone());

    store.record_translation("hello", "merhaba", "tr");
    store.promote_to_favorite(0);
    store.clear_history();

    assert_eq!(kv.get(HISTORY_KEY)?, None);
    assert_eq!(store.list_favorites().len(), 1);
    Ok(())
}

#[test]
fn test_open_withNestedMissingDirectory_shouldCreateIt() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("deeper").join("store.db");

    let store = SqliteStore::open(&path)?;
    store.set("theme", "dark")?;

    assert!(path.exists());
    Ok(())
}
