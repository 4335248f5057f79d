/*!
 * Translation provider clients.
 *
 * - MyMemory: the public translation API used by the application
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single translation request as sent to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text to translate, already trimmed
    pub text: String,
    /// Concrete source language (never the auto-detect sentinel)
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Language pair in the provider's `from|to` notation
    pub fn language_pair(&self) -> String {
        format!("{}|{}", self.source_language, self.target_language)
    }
}

/// Interface of the translation provider.
///
/// Implementations perform exactly one attempt per call and return the raw
/// JSON body; extracting the translated text is left to the caller.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human-readable provider name for logs
    fn name(&self) -> &str;

    /// Send the request and return the parsed JSON body
    ///
    /// # Arguments
    /// * `request` - The request to send
    ///
    /// # Returns
    /// * `Result<Value, ProviderError>` - The response body or a transport/parse error
    async fn fetch(&self, request: &TranslationRequest) -> Result<Value, ProviderError>;
}

pub mod mymemory;
pub mod mock;
