/*!
 * Persisted translation history, favorites and theme preference.
 *
 * Both lists are stored as JSON arrays in a key-value store, newest entry
 * first, each capped at a fixed length. All operations are fail-soft: a
 * storage failure is logged and the call still returns normally.
 */

use chrono::{SecondsFormat, Utc};
use log::{debug, error, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::storage::KeyValueStore;

/// Storage key of the history list
pub const HISTORY_KEY: &str = "translationHistory";

/// Storage key of the favorites list
pub const FAVORITES_KEY: &str = "favorites";

/// Storage key of the theme preference
pub const THEME_KEY: &str = "theme";

/// Default cap for each list
pub const DEFAULT_LIST_LIMIT: usize = 200;

fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// Id for an entry stored without one.
///
/// Derived from the entry content and its position counted from the oldest
/// entry, so it stays the same on every read even if the write-back fails.
fn derive_entry_id(key: &str, position: usize, entry: &HistoryEntry) -> String {
    let seed = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        key, position, entry.input, entry.output, entry.language_target, entry.created_at
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
}

/// A successful translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Stable identifier; entries stored without one get an id on first load
    #[serde(default)]
    pub id: String,

    /// Source text as submitted
    pub input: String,

    /// Translated text
    pub output: String,

    /// Target language of the request
    #[serde(alias = "lang", default)]
    pub language_target: String,

    /// ISO-8601 creation time
    #[serde(alias = "at", default)]
    pub created_at: String,
}

/// A history entry promoted by the user
pub type FavoriteEntry = HistoryEntry;

impl HistoryEntry {
    /// Create an entry stamped with a fresh id and the current time
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        language_target: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_entry_id(),
            input: input.into(),
            output: output.into(),
            language_target: language_target.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Whether both entries hold the same input/output pair
    pub fn same_pair(&self, other: &HistoryEntry) -> bool {
        self.input == other.input && self.output == other.output
    }

    /// Date part of the creation time, empty when unknown
    pub fn created_date(&self) -> &str {
        self.created_at.split('T').next().unwrap_or_default()
    }
}

/// Persisted color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Dark,
    #[default]
    Light,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(anyhow::anyhow!("Invalid theme: {}", s)),
        }
    }
}

/// Owner of the history and favorites lists
#[derive(Debug, Clone)]
pub struct PersistenceStore {
    kv: Arc<dyn KeyValueStore>,
    limit: usize,
    /// Held by every list operation; `read_list` may write back
    write_lock: Arc<Mutex<()>>,
}

impl PersistenceStore {
    /// Create a store capped at the default list length
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limit(kv, DEFAULT_LIST_LIMIT)
    }

    /// Create a store with a custom list cap
    pub fn with_limit(kv: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            kv,
            limit: limit.max(1),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Maximum length of each list
    pub fn limit(&self) -> usize {
        self.limit
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Insert an entry at the head of the history, evicting the oldest beyond the cap
    pub fn append_history(&self, entry: HistoryEntry) {
        let _guard = self.write_lock.lock();
        let mut history = self.read_list(HISTORY_KEY);
        history.insert(0, entry);
        history.truncate(self.limit);
        self.write_list(HISTORY_KEY, &history);
    }

    /// Create and append the entry for a successful translation
    pub fn record_translation(&self, input: &str, output: &str, language_target: &str) -> HistoryEntry {
        let entry = HistoryEntry::new(input, output, language_target);
        self.append_history(entry.clone());
        entry
    }

    /// History snapshot, newest first
    pub fn list_history(&self) -> Vec<HistoryEntry> {
        let _guard = self.write_lock.lock();
        self.read_list(HISTORY_KEY)
    }

    /// Remove every history entry; favorites are untouched
    pub fn clear_history(&self) {
        let _guard = self.write_lock.lock();
        self.remove_key(HISTORY_KEY);
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Promote the history entry at `index` of the current history.
    ///
    /// Returns `false` without error when the index is out of range or the
    /// input/output pair is already a favorite. The position is resolved
    /// against the history as stored now, so prefer
    /// [`promote_to_favorite_by_id`](Self::promote_to_favorite_by_id) when the
    /// index came from an earlier snapshot.
    pub fn promote_to_favorite(&self, index: usize) -> bool {
        let _guard = self.write_lock.lock();
        match self.read_list(HISTORY_KEY).into_iter().nth(index) {
            Some(entry) => self.insert_favorite(entry),
            None => {
                debug!("No history entry at index {}, nothing to promote", index);
                false
            }
        }
    }

    /// Promote the history entry with the given stable id
    pub fn promote_to_favorite_by_id(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock();
        match self.read_list(HISTORY_KEY).into_iter().find(|e| e.id == id) {
            Some(entry) => self.insert_favorite(entry),
            None => {
                debug!("No history entry with id {}, nothing to promote", id);
                false
            }
        }
    }

    /// Favorites snapshot, newest first
    pub fn list_favorites(&self) -> Vec<FavoriteEntry> {
        let _guard = self.write_lock.lock();
        self.read_list(FAVORITES_KEY)
    }

    /// Remove every favorite; history is untouched
    pub fn clear_favorites(&self) {
        let _guard = self.write_lock.lock();
        self.remove_key(FAVORITES_KEY);
    }

    // Caller holds the write lock
    fn insert_favorite(&self, entry: HistoryEntry) -> bool {
        let mut favorites = self.read_list(FAVORITES_KEY);
        if favorites.iter().any(|f| f.same_pair(&entry)) {
            debug!("'{}' is already a favorite", entry.input);
            return false;
        }

        favorites.insert(0, entry);
        favorites.truncate(self.limit);
        self.write_list(FAVORITES_KEY, &favorites);
        true
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// Stored theme; missing or unknown values read as light
    pub fn theme(&self) -> ThemePreference {
        match self.kv.get(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_default(),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                ThemePreference::default()
            }
        }
    }

    pub fn set_theme(&self, theme: ThemePreference) {
        if let Err(e) = self.kv.set(THEME_KEY, theme.as_str()) {
            error!("Failed to persist theme preference: {}", e);
        }
    }

    /// Flip and persist the theme, returning the new value
    pub fn toggle_theme(&self) -> ThemePreference {
        let theme = self.theme().toggled();
        self.set_theme(theme);
        theme
    }

    // =========================================================================
    // Raw list access
    // =========================================================================

    // Caller holds the write lock
    fn read_list(&self, key: &str) -> Vec<HistoryEntry> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read '{}': {}", key, e);
                return Vec::new();
            }
        };

        let mut list: Vec<HistoryEntry> = match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!("Stored '{}' is corrupt, treating as empty: {}", key, e);
                return Vec::new();
            }
        };

        let mut assigned = 0;
        let len = list.len();
        for (index, entry) in list.iter_mut().enumerate() {
            if entry.id.is_empty() {
                entry.id = derive_entry_id(key, len - 1 - index, entry);
                assigned += 1;
            }
        }
        if assigned > 0 {
            debug!("Assigned ids to {} stored '{}' entries", assigned, key);
            self.write_list(key, &list);
        }

        list
    }

    fn write_list(&self, key: &str, list: &[HistoryEntry]) {
        let result = serde_json::to_string(list)
            .map_err(StorageError::from)
            .and_then(|json| self.kv.set(key, &json));

        if let Err(e) = result {
            error!("Failed to persist '{}' ({} entries): {}", key, list.len(), e);
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.kv.remove(key) {
            error!("Failed to clear '{}': {}", key, e);
        }
    }
}
