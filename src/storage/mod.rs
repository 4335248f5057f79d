/*!
 * Key-value storage for persisted application state.
 *
 * This module provides string-keyed, string-valued storage with the
 * semantics of browser local storage:
 * - SQLite-backed store for persistence across runs
 * - In-memory store with an optional byte quota
 */

pub mod schema;
pub mod connection;
pub mod kv;

// Re-export main types
pub use connection::DatabaseConnection;
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
