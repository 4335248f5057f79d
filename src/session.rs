/*!
 * Translation session.
 *
 * A session owns everything the interactive front end mutates: the selected
 * language pair, the debounce timer, the request sequencer and the content of
 * the output area. Front ends hold a `TranslationSession` (cheap to clone) and
 * observe output changes through [`TranslationSession::subscribe`].
 */

use anyhow::Result;
use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;

use crate::errors::{ActionError, SwapError, TranslationError};
use crate::language_utils;
use crate::output::{DisplayedOutput, FailureKind, SpeechRequest};
use crate::persistence::PersistenceStore;
use crate::translation::{Debouncer, RequestSequencer, TranslatedText, TranslationClient};

/// Selected source and target languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    /// Source language code or the auto-detect sentinel
    pub source: String,
    /// Target language code
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn is_auto_detect(&self) -> bool {
        language_utils::is_auto_detect(&self.source)
    }

    /// The pair with source and target exchanged
    pub fn swapped(&self) -> Result<Self, SwapError> {
        if self.is_auto_detect() {
            return Err(SwapError::AutoDetect);
        }
        Ok(Self::new(self.target.clone(), self.source.clone()))
    }
}

struct SessionInner {
    client: TranslationClient,
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    languages: RwLock<LanguagePair>,
    output: watch::Sender<DisplayedOutput>,
    /// Orders sequence checks against output/history updates
    apply_lock: Mutex<()>,
}

/// Interactive translation session
#[derive(Clone)]
pub struct TranslationSession {
    inner: Arc<SessionInner>,
}

impl TranslationSession {
    /// Create a session with the given quiet period for debounced input
    pub fn new(client: TranslationClient, languages: LanguagePair, debounce: Duration) -> Self {
        let (output, _) = watch::channel(DisplayedOutput::Idle);
        Self {
            inner: Arc::new(SessionInner {
                client,
                debouncer: Debouncer::new(debounce),
                sequencer: RequestSequencer::new(),
                languages: RwLock::new(languages),
                output,
                apply_lock: Mutex::new(()),
            }),
        }
    }

    /// Persistence store used for history and favorites
    pub fn store(&self) -> &PersistenceStore {
        self.inner.client.store()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Handle an input change: translate `input_snapshot` once input has been
    /// quiet for the debounce period.
    pub fn schedule_translate(&self, input_snapshot: impl Into<String>) {
        let input = input_snapshot.into();
        let session: Weak<SessionInner> = Arc::downgrade(&self.inner);

        self.inner.debouncer.schedule(move || async move {
            if let Some(inner) = session.upgrade() {
                let session = TranslationSession { inner };
                // Outcome is published through the output channel
                let _ = session.translate_now(&input).await;
            }
        });
    }

    /// Cancel a scheduled translation that has not fired yet
    pub fn cancel_pending(&self) -> bool {
        self.inner.debouncer.cancel_pending()
    }

    /// Translate `input` immediately with the current language pair.
    ///
    /// Returns `Ok(None)` when a newer request was dispatched before this one
    /// finished; its result is then discarded and neither displayed nor
    /// recorded.
    pub async fn translate_now(&self, input: &str) -> Result<Option<TranslatedText>, TranslationError> {
        let sequence = self.begin();
        let languages = self.language_pair();

        let request = match self.inner.client.prepare(input, &languages.source, &languages.target) {
            Ok(request) => request,
            Err(e) => {
                self.apply(sequence, DisplayedOutput::Failure(FailureKind::from(&e)), || {});
                return Err(e);
            }
        };

        if !self.apply(sequence, DisplayedOutput::InProgress, || {}) {
            return Ok(None);
        }

        match self.inner.client.fetch_translation(&request).await {
            Ok(translated) => {
                let applied = self.apply(
                    sequence,
                    DisplayedOutput::Translation(translated.to_string()),
                    || {
                        self.inner.client.record(&request, &translated);
                    },
                );
                if applied {
                    Ok(Some(translated))
                } else {
                    debug!("Discarding stale translation #{} for '{}'", sequence, request.text);
                    Ok(None)
                }
            }
            Err(e) => {
                if self.apply(sequence, DisplayedOutput::Failure(FailureKind::from(&e)), || {}) {
                    Err(e)
                } else {
                    debug!("Discarding stale failure #{}: {}", sequence, e);
                    Ok(None)
                }
            }
        }
    }

    fn begin(&self) -> u64 {
        let _guard = self.inner.apply_lock.lock();
        self.inner.sequencer.next()
    }

    /// Publish `output` and run `on_apply` if `sequence` is still the latest
    fn apply(&self, sequence: u64, output: DisplayedOutput, on_apply: impl FnOnce()) -> bool {
        let _guard = self.inner.apply_lock.lock();
        if !self.inner.sequencer.is_latest(sequence) {
            return false;
        }
        on_apply();
        self.inner.output.send_replace(output);
        true
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Current content of the output area
    pub fn output(&self) -> DisplayedOutput {
        self.inner.output.borrow().clone()
    }

    /// Receiver notified on every output change
    pub fn subscribe(&self) -> watch::Receiver<DisplayedOutput> {
        self.inner.output.subscribe()
    }

    /// Speech request for the displayed translation
    pub fn speech_request(&self) -> Result<SpeechRequest, ActionError> {
        let output = self.output();
        let text = output.actionable_text()?;
        Ok(SpeechRequest::new(text, &self.language_pair().target))
    }

    /// Text to put on the clipboard
    pub fn clipboard_text(&self) -> Result<String, ActionError> {
        self.output().actionable_text().map(str::to_string)
    }

    // =========================================================================
    // Languages
    // =========================================================================

    pub fn language_pair(&self) -> LanguagePair {
        self.inner.languages.read().clone()
    }

    /// Exchange source and target; refused while auto-detect is selected
    pub fn swap_languages(&self) -> Result<LanguagePair, SwapError> {
        let mut languages = self.inner.languages.write();
        *languages = languages.swapped()?;
        info!("Languages swapped: {} -> {}", languages.source, languages.target);
        Ok(languages.clone())
    }

    /// Select the source language (`auto` allowed)
    pub fn set_source_language(&self, code: &str) -> Result<()> {
        let code = code.trim();
        if !language_utils::is_auto_detect(code) {
            language_utils::validate_language_code(code)?;
        }
        self.inner.languages.write().source = code.to_string();
        Ok(())
    }

    /// Select the target language
    pub fn set_target_language(&self, code: &str) -> Result<()> {
        let code = code.trim();
        if language_utils::is_auto_detect(code) {
            return Err(anyhow::anyhow!("Target language cannot be auto-detect"));
        }
        language_utils::validate_language_code(code)?;
        self.inner.languages.write().target = code.to_string();
        Ok(())
    }
}
