/*!
 * Extraction of the translated text from provider response bodies.
 *
 * The provider may place the translation in different parts of the body.
 * A `ResponseNormalizer` holds an ordered list of extraction strategies and
 * returns the first non-empty string any of them finds.
 */

use log::debug;
use serde_json::Value;
use std::fmt::Debug;

/// One way of locating the translated text in a response body
pub trait ExtractionStrategy: Send + Sync + Debug {
    /// Short name for logs
    fn name(&self) -> &str;

    /// The translated text, or `None` when absent or empty
    fn extract<'a>(&self, body: &'a Value) -> Option<&'a str>;
}

/// Strategy reading a string at a JSON pointer
#[derive(Debug, Clone)]
pub struct JsonPointerStrategy {
    name: String,
    pointer: String,
}

impl JsonPointerStrategy {
    /// Create a strategy for `pointer` (RFC 6901, e.g. `/matches/0/translation`)
    pub fn new(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pointer: pointer.into(),
        }
    }

    /// `responseData.translatedText`
    pub fn primary_field() -> Self {
        Self::new("primary field", "/responseData/translatedText")
    }

    /// `matches[0].translation`
    pub fn first_match() -> Self {
        Self::new("first match", "/matches/0/translation")
    }
}

impl ExtractionStrategy for JsonPointerStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract<'a>(&self, body: &'a Value) -> Option<&'a str> {
        body.pointer(&self.pointer)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }
}

/// Ordered list of extraction strategies
#[derive(Debug)]
pub struct ResponseNormalizer {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ResponseNormalizer {
    /// Normalizer without strategies; every body yields `None`
    pub fn empty() -> Self {
        Self { strategies: Vec::new() }
    }

    /// Append a strategy, tried after every strategy added before it
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the strategies in the order they are tried
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First non-empty translation found by the strategies, in order
    pub fn normalize<'a>(&self, body: &'a Value) -> Option<&'a str> {
        self.strategies.iter().find_map(|strategy| {
            let text = strategy.extract(body);
            if text.is_some() {
                debug!("Translation found via {}", strategy.name());
            }
            text
        })
    }
}

impl Default for ResponseNormalizer {
    /// Primary field first, then the first candidate match
    fn default() -> Self {
        Self::empty()
            .with_strategy(JsonPointerStrategy::primary_field())
            .with_strategy(JsonPointerStrategy::first_match())
    }
}
