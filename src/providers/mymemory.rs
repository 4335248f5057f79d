use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// MyMemory client for interacting with the MyMemory translation API
#[derive(Debug)]
pub struct MyMemory {
    /// HTTP client for API requests
    client: Client,
    /// Full URL of the `get` endpoint
    endpoint: String,
    /// Contact email sent as `de`, raises the daily quota
    email: Option<String>,
    /// Request timeout, kept for error reporting
    timeout: Duration,
}

impl MyMemory {
    /// Create a new MyMemory client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            email: None,
            timeout,
        }
    }

    /// Create a client from the provider section of the configuration
    pub fn from_config(config: &ProviderConfig) -> Self {
        let client = Self::new(config.endpoint.clone(), config.timeout());
        match &config.email {
            Some(email) if !email.trim().is_empty() => client.with_email(email.trim()),
            _ => client,
        }
    }

    /// Set the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Build the GET URL for a request
    pub fn request_url(&self, request: &TranslationRequest) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", &request.text);
            query.append_pair("langpair", &request.language_pair());
            if let Some(email) = &self.email {
                query.append_pair("de", email);
            }
        }

        Ok(url)
    }

    fn map_send_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout.as_secs())
        } else if error.is_connect() {
            ProviderError::ConnectionError(error.to_string())
        } else {
            ProviderError::RequestFailed(error.to_string())
        }
    }
}

/// Reject bodies in which MyMemory reports an error.
///
/// MyMemory answers quota and language-pair problems with HTTP 200 and a
/// `responseStatus` of 4xx/5xx in the body, either as number or string.
pub fn check_response_status(body: &Value) -> Result<(), ProviderError> {
    let status = match body.get("responseStatus") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match status {
        Some(code) if code >= 400 => {
            let message = body
                .get("responseDetails")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .or_else(|| body.pointer("/responseData/translatedText").and_then(Value::as_str))
                .unwrap_or("unknown provider error")
                .to_string();
            Err(ProviderError::ApiError {
                status_code: u16::try_from(code).unwrap_or(u16::MAX),
                message,
            })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl Provider for MyMemory {
    fn name(&self) -> &str {
        "MyMemory"
    }

    async fn fetch(&self, request: &TranslationRequest) -> Result<Value, ProviderError> {
        let url = self.request_url(request)?;
        debug!("MyMemory request: langpair={} ({} chars)", request.language_pair(), request.text.chars().count());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("MyMemory API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body_text = response.text().await.map_err(|e| self.map_send_error(e))?;
        let body: Value = serde_json::from_str(&body_text)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        check_response_status(&body)?;
        debug!("MyMemory response: {}", body);

        Ok(body)
    }
}
