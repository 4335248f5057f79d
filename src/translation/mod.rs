/*!
 * Translation request lifecycle.
 *
 * - `client`: validation, provider call, history recording
 * - `extract`: ordered strategies locating the translated text in a response
 * - `debounce`: coalescing of rapid input changes
 * - `sequencer`: sequence numbers discarding out-of-order responses
 */

// Re-export main types for easier usage
pub use self::client::{TranslatedText, TranslationClient};
pub use self::debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use self::extract::{ExtractionStrategy, JsonPointerStrategy, ResponseNormalizer};
pub use self::sequencer::RequestSequencer;

// Submodules
pub mod client;
pub mod debounce;
pub mod extract;
pub mod sequencer;
