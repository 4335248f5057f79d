/*!
 * Mock provider implementation for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a primary-field response
 * - `MockProvider::matches_only()` - Answers only through the match list
 * - `MockProvider::empty()` - Answers with a body holding no translation
 * - `MockProvider::failing()` - Always fails with a connection error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Translation under `responseData.translatedText`
    Working,
    /// Empty primary field, translation in `matches[0].translation`
    MatchesOnly,
    /// Fixed response body
    Fixed(Value),
    /// Fails every Nth request with a connection error
    Intermittent { fail_every: usize },
    /// Always fails with a connection error
    Failing,
    /// Body that is not valid JSON
    Malformed,
    /// Valid JSON with neither primary field nor matches
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, in arrival order
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Custom translation generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
    /// Simulated latency per request in milliseconds (optional)
    delay: Option<fn(&TranslationRequest) -> u64>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
            delay: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that only fills the candidate match list
    pub fn matches_only() -> Self {
        Self::new(MockBehavior::MatchesOnly)
    }

    /// Create a mock that always answers with `body`
    pub fn fixed(body: Value) -> Self {
        Self::new(MockBehavior::Fixed(body))
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose body cannot be parsed
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Create a mock that returns a body without any translation
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom translation generator
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Set a per-request latency in milliseconds
    pub fn with_delay(mut self, delay: fn(&TranslationRequest) -> u64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    fn translated_text(&self, request: &TranslationRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[{}] {}", request.target_language, request.text),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn fetch(&self, request: &TranslationRequest) -> Result<Value, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            let delay_ms = delay(request);
            if delay_ms > 0 {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
            }
        }

        match &self.behavior {
            MockBehavior::Working => Ok(json!({
                "responseData": { "translatedText": self.translated_text(request), "match": 1 },
                "responseStatus": 200,
                "matches": [],
            })),

            MockBehavior::MatchesOnly => Ok(json!({
                "responseData": { "translatedText": "" },
                "matches": [
                    { "segment": request.text, "translation": self.translated_text(request), "quality": "74" },
                    { "segment": request.text, "translation": "second candidate", "quality": "50" },
                ],
            })),

            MockBehavior::Fixed(body) => Ok(body.clone()),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated intermittent failure (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(json!({ "responseData": { "translatedText": self.translated_text(request) } }))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated provider failure".to_string(),
            )),

            MockBehavior::Malformed => serde_json::from_str::<Value>("<html>Bad Gateway</html>")
                .map_err(|e| ProviderError::ParseError(e.to_string())),

            MockBehavior::Empty => Ok(json!({ "responseStatus": 200 })),
        }
    }
}
