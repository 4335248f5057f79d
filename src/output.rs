/*!
 * Content of the output area.
 *
 * The output area shows either a real translation or a status message. Status
 * messages start with a sentinel marker so that speak/copy can refuse to act
 * on them.
 */

use std::fmt;

use crate::errors::{ActionError, TranslationError};
use crate::language_utils;

/// Markers that open every status message
pub const STATUS_SENTINELS: [&str; 4] = ["⚠️", "❌", "💡", "⏳"];

pub const IDLE_HINT: &str = "💡 Type something to translate.";
pub const IN_PROGRESS_STATUS: &str = "⏳ Translating...";
pub const EMPTY_INPUT_WARNING: &str = "⚠️ Please enter some text!";
pub const EMPTY_RESPONSE_ERROR: &str = "❌ No translation received (the API returned an empty response).";
pub const NETWORK_ERROR: &str = "❌ An error occurred during translation.";

pub const NOTHING_TO_SPEAK: &str = "No translation available to speak!";
pub const NOTHING_TO_COPY: &str = "No valid translation to copy!";
pub const SWAP_REFUSED: &str = "🌍 Cannot swap languages while auto-detect is selected!";

/// Failure kinds shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyInput,
    EmptyResponse,
    Network,
}

impl FailureKind {
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::EmptyInput => EMPTY_INPUT_WARNING,
            Self::EmptyResponse => EMPTY_RESPONSE_ERROR,
            Self::Network => NETWORK_ERROR,
        }
    }
}

impl From<&TranslationError> for FailureKind {
    fn from(error: &TranslationError) -> Self {
        match error {
            TranslationError::EmptyInput => Self::EmptyInput,
            TranslationError::EmptyResponse => Self::EmptyResponse,
            TranslationError::Network(_) => Self::Network,
        }
    }
}

/// What the output area currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayedOutput {
    #[default]
    Idle,
    InProgress,
    Translation(String),
    Failure(FailureKind),
}

impl DisplayedOutput {
    /// Text rendered in the output area
    pub fn text(&self) -> &str {
        match self {
            Self::Idle => IDLE_HINT,
            Self::InProgress => IN_PROGRESS_STATUS,
            Self::Translation(text) => text,
            Self::Failure(kind) => kind.status_text(),
        }
    }

    /// Whether a real translation is displayed
    pub fn is_translation(&self) -> bool {
        matches!(self, Self::Translation(_))
    }

    /// The displayed translation, refusing empty or status text
    pub fn actionable_text(&self) -> Result<&str, ActionError> {
        match self {
            Self::Translation(text) if !text.is_empty() && !is_status_text(text) => Ok(text),
            _ => Err(ActionError::NoTranslation),
        }
    }
}

impl fmt::Display for DisplayedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Whether `text` carries a status sentinel
pub fn is_status_text(text: &str) -> bool {
    STATUS_SENTINELS.iter().any(|marker| text.contains(marker))
}

/// Text to hand to speech synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    /// BCP-47 locale for the voice, e.g. `tr-TR`
    pub locale: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, target_language: &str) -> Self {
        Self {
            text: text.into(),
            locale: language_utils::speech_locale_for(target_language),
        }
    }
}
