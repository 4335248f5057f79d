/*!
 * # LinguaFlow
 *
 * A Rust library and command-line tool for quick text translation through
 * the MyMemory translation API.
 *
 * ## Features
 *
 * - Translate text between any language pair supported by MyMemory
 * - Auto-detect source selection (mapped to a configurable fallback language)
 * - Debounced translate-as-you-type with out-of-order responses discarded
 * - Persistent history and favorites (newest first, capped at 200 entries)
 * - Speech and clipboard hand-off guarded against status messages
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `storage`: Key-value stores (SQLite, in-memory)
 * - `persistence`: History, favorites and theme on top of a key-value store
 * - `providers`: Translation provider clients:
 *   - `providers::mymemory`: MyMemory API client
 *   - `providers::mock`: Scripted provider for tests
 * - `translation`: Request lifecycle:
 *   - `translation::client`: Translation client
 *   - `translation::extract`: Response normalization strategies
 *   - `translation::debounce`: Debounced scheduling
 *   - `translation::sequencer`: Request sequence numbers
 * - `session`: Interactive session state
 * - `output`: Output area content and status messages
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod output;
pub mod persistence;
pub mod providers;
pub mod session;
pub mod storage;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{ActionError, ProviderError, StorageError, SwapError, TranslationError};
pub use output::{DisplayedOutput, FailureKind, SpeechRequest};
pub use persistence::{FavoriteEntry, HistoryEntry, PersistenceStore, ThemePreference};
pub use session::{LanguagePair, TranslationSession};
pub use translation::{TranslatedText, TranslationClient};
