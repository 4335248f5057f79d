/*!
 * Integration tests for the MyMemory client against a local HTTP responder
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use linguaflow::app_config::ProviderConfig;
use linguaflow::errors::{ProviderError, TranslationError};
use linguaflow::providers::mymemory::MyMemory;
use linguaflow::providers::{Provider, TranslationRequest};
use linguaflow::TranslationClient;

use crate::common::{init_logging, memory_store, serve_once, serve_once_after, unused_endpoint};

const MERHABA: &str = r#"{"responseData":{"translatedText":"merhaba","match":1},"responseStatus":200,"matches":[]}"#;

/// Query parameters of a `GET <path>?<query> HTTP/1.1` request line
fn query_of(request_line: &str) -> Vec<(String, String)> {
    let target = request_line.split_whitespace().nth(1).unwrap_or_default();
    Url::parse(&format!("http://localhost{}", target))
        .map(|url| url.query_pairs().into_owned().collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_fetch_withSuccessfulResponse_shouldSendGetWithQueryParameters() -> Result<()> {
    init_logging();
    let server = serve_once("200 OK", MERHABA).await?;
    let provider = MyMemory::new(server.endpoint.clone(), Duration::from_secs(5));

    let body = provider.fetch(&TranslationRequest::new("good night", "en", "tr")).await?;
    let request_line = server.request_line().await?;

    assert_eq!(body["responseData"]["translatedText"], "merhaba");
    assert!(request_line.starts_with("GET /get?"));
    assert_eq!(
        query_of(&request_line),
        vec![
            ("q".to_string(), "good night".to_string()),
            ("langpair".to_string(), "en|tr".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_fetch_withConfiguredEmail_shouldSendDeParameter() -> Result<()> {
    let server = serve_once("200 OK", MERHABA).await?;
    let config = ProviderConfig {
        endpoint: server.endpoint.clone(),
        timeout_secs: 5,
        email: Some("me@example.com".to_string()),
    };
    let provider = MyMemory::from_config(&config);

    provider.fetch(&TranslationRequest::new("hello", "en", "tr")).await?;
    let query = query_of(&server.request_line().await?);

    assert!(query.contains(&("de".to_string(), "me@example.com".to_string())));
    Ok(())
}

/// End to end: client, provider and history over real HTTP
#[tokio::test]
async fn test_translate_withLocalServer_shouldRecordHistory() -> Result<()> {
    let server = serve_once("200 OK", MERHABA).await?;
    let provider = MyMemory::new(server.endpoint.clone(), Duration::from_secs(5));
    let client = TranslationClient::new(Arc::new(provider), memory_store(), "en");

    let translated = client.translate("hello", "auto", "tr").await?;
    let query = query_of(&server.request_line().await?);

    assert_eq!(translated.as_str(), "merhaba");
    assert!(query.contains(&("langpair".to_string(), "en|tr".to_string())));
    assert_eq!(client.store().list_history()[0].output, "merhaba");
    Ok(())
}

#[tokio::test]
async fn test_fetch_withHttpError_shouldReturnApiError() -> Result<()> {
    let server = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await?;
    let provider = MyMemory::new(server.endpoint.clone(), Duration::from_secs(5));

    let result = provider.fetch(&TranslationRequest::new("hello", "en", "tr")).await;

    match result {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
    Ok(())
}

/// MyMemory reports quota problems with HTTP 200 and an error status in the body
#[tokio::test]
async fn test_fetch_withErrorStatusInBody_shouldReturnApiError() -> Result<()> {
    let body = r#"{"responseData":{"translatedText":"MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"},"responseStatus":"429","responseDetails":"daily quota exceeded"}"#;
    let server = serve_once("200 OK", body).await?;
    let provider = MyMemory::new(server.endpoint.clone(), Duration::from_secs(5));
    let client = TranslationClient::new(Arc::new(provider), memory_store(), "en");

    let result = client.translate("hello", "en", "tr").await;

    match result {
        Err(TranslationError::Network(ProviderError::ApiError { status_code, message })) => {
            assert_eq!(status_code, 429);
            assert_eq!(message, "daily quota exceeded");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
    assert!(client.store().list_history().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_fetch_withNonJsonBody_shouldReturnParseError() -> Result<()> {
    let server = serve_once("200 OK", "<html>Bad Gateway</html>").await?;
    let provider = MyMemory::new(server.endpoint.clone(), Duration::from_secs(5));

    let result = provider.fetch(&TranslationRequest::new("hello", "en", "tr")).await;

    assert!(matches!(result, Err(ProviderError::ParseError(_))));
    Ok(())
}

#[tokio::test]
async fn test_fetch_withNothingListening_shouldReturnConnectionError() -> Result<()> {
    let provider = MyMemory::new(unused_endpoint().await?, Duration::from_secs(5));

    let result = provider.fetch(&TranslationRequest::new("hello", "en", "tr")).await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
    Ok(())
}

#[tokio::test]
async fn test_fetch_withSlowServer_shouldTimeOut() -> Result<()> {
    let server = serve_once_after("200 OK", MERHABA, Duration::from_secs(3)).await?;
    let provider = MyMemory::new(server.endpoint.clone(), Duration::from_millis(200));

    let result = provider.fetch(&TranslationRequest::new("hello", "en", "tr")).await;

    assert!(matches!(result, Err(ProviderError::Timeout(_))));
    Ok(())
}
