/*!
 * Translation client.
 *
 * Validates the input, resolves the auto-detect sentinel, performs a single
 * provider call, normalizes the response and records successful translations
 * in the history.
 */

use log::{debug, warn};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::language_utils;
use crate::persistence::{HistoryEntry, PersistenceStore};
use crate::providers::{Provider, TranslationRequest};

use super::extract::ResponseNormalizer;

/// Normalized, non-empty translated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedText(String);

impl TranslatedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for TranslatedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TranslatedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client issuing translation requests against one provider
#[derive(Debug, Clone)]
pub struct TranslationClient {
    provider: Arc<dyn Provider>,
    normalizer: Arc<ResponseNormalizer>,
    store: PersistenceStore,
    auto_detect_fallback: String,
}

impl TranslationClient {
    /// Create a client with the default normalization strategies
    pub fn new(
        provider: Arc<dyn Provider>,
        store: PersistenceStore,
        auto_detect_fallback: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            normalizer: Arc::new(ResponseNormalizer::default()),
            store,
            auto_detect_fallback: auto_detect_fallback.into(),
        }
    }

    /// Replace the response normalizer
    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// The store receiving history entries
    pub fn store(&self) -> &PersistenceStore {
        &self.store
    }

    /// Build the provider request, rejecting empty input
    pub fn prepare(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationRequest, TranslationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        let source = language_utils::resolve_source_language(source_language, &self.auto_detect_fallback);
        if source != source_language.trim() {
            debug!("Auto-detect is unsupported, using '{}' as source language", source);
        }

        Ok(TranslationRequest::new(text, source, target_language.trim()))
    }

    /// Translate `text` and record the result in the history.
    ///
    /// Makes no network call for empty input and does not retry. History is
    /// only touched on success.
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedText, TranslationError> {
        let request = self.prepare(text, source_language, target_language)?;
        let translated = self.fetch_translation(&request).await?;
        self.record(&request, &translated);
        Ok(translated)
    }

    /// Perform the provider call and normalization without touching history
    pub async fn fetch_translation(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslatedText, TranslationError> {
        let body = self.provider.fetch(request).await.map_err(|e| {
            warn!("{} request failed: {}", self.provider.name(), e);
            TranslationError::Network(e)
        })?;

        match self.normalizer.normalize(&body) {
            Some(text) => {
                debug!(
                    "Translated {} chars ({})",
                    request.text.chars().count(),
                    request.language_pair()
                );
                Ok(TranslatedText(text.to_string()))
            }
            None => {
                warn!("{} returned no usable translation", self.provider.name());
                Err(TranslationError::EmptyResponse)
            }
        }
    }

    /// Append the history entry for a successful translation
    pub fn record(&self, request: &TranslationRequest, translated: &TranslatedText) -> HistoryEntry {
        self.store
            .record_translation(&request.text, translated.as_str(), &request.target_language)
    }
}
