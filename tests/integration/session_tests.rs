/*!
 * Integration tests for the translation session: debouncing, out-of-order
 * responses and the output area
 */

use std::time::Duration;

use linguaflow::errors::{ActionError, SwapError, TranslationError};
use linguaflow::output::{self, DisplayedOutput, FailureKind};
use linguaflow::providers::TranslationRequest;
use linguaflow::providers::mock::MockProvider;
use linguaflow::LanguagePair;

use crate::common::{init_logging, mock_session};

fn slow_for_slow_text(request: &TranslationRequest) -> u64 {
    if request.text.starts_with("slow") { 500 } else { 10 }
}

/// A burst of keystrokes produces a single request carrying the last value
#[tokio::test(start_paused = true)]
async fn test_schedule_translate_withBurstOfInput_shouldSendOneRequest() {
    init_logging();
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");

    for snapshot in ["h", "he", "hel", "hell", "hello"] {
        session.schedule_translate(snapshot);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(provider.request_count(), 0);

    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert_eq!(provider.request_count(), 1);
    assert_eq!(provider.requests()[0].text, "hello");
    assert_eq!(session.output(), DisplayedOutput::Translation("[tr] hello".to_string()));
    assert_eq!(session.store().list_history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_translate_withPausesLongerThanQuietPeriod_shouldSendEach() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");

    session.schedule_translate("one");
    tokio::time::sleep(Duration::from_millis(700)).await;
    session.schedule_translate("two");
    tokio::time::sleep(Duration::from_millis(700)).await;

    let texts: Vec<String> = provider.requests().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["one", "two"]);
}

/// The response of an older request never overwrites a newer one
#[tokio::test(start_paused = true)]
async fn test_translate_now_withOutOfOrderResponses_shouldDiscardStaleResult() {
    let provider = MockProvider::working().with_delay(slow_for_slow_text);
    let session = mock_session(&provider, "en", "tr");

    let (slow, fast) = tokio::join!(session.translate_now("slow text"), session.translate_now("fast text"));

    assert_eq!(slow.unwrap(), None);
    assert_eq!(fast.unwrap().unwrap().as_str(), "[tr] fast text");
    assert_eq!(provider.request_count(), 2);

    assert_eq!(session.output(), DisplayedOutput::Translation("[tr] fast text".to_string()));
    let history = session.store().list_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].input, "fast text");
}

#[tokio::test(start_paused = true)]
async fn test_translate_now_withNewerEmptyInput_shouldDiscardOlderResult() {
    let provider = MockProvider::working().with_delay(slow_for_slow_text);
    let session = mock_session(&provider, "en", "tr");

    let (slow, empty) = tokio::join!(session.translate_now("slow text"), session.translate_now("   "));

    assert_eq!(slow.unwrap(), None);
    assert!(matches!(empty, Err(TranslationError::EmptyInput)));
    assert_eq!(session.output(), DisplayedOutput::Failure(FailureKind::EmptyInput));
    assert!(session.store().list_history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_translate_now_whileInFlight_shouldShowProgressAndRefuseActions() {
    let provider = MockProvider::working().with_delay(slow_for_slow_text);
    let session = mock_session(&provider, "en", "tr");
    assert_eq!(session.output(), DisplayedOutput::Idle);

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.translate_now("slow text").await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(session.output(), DisplayedOutput::InProgress);
    assert_eq!(session.output().text(), output::IN_PROGRESS_STATUS);
    assert_eq!(session.speech_request(), Err(ActionError::NoTranslation));
    assert_eq!(session.clipboard_text(), Err(ActionError::NoTranslation));

    task.await.unwrap().unwrap();

    let speech = session.speech_request().unwrap();
    assert_eq!(speech.text, "[tr] slow text");
    assert_eq!(speech.locale, "tr-TR");
    assert_eq!(session.clipboard_text().unwrap(), "[tr] slow text");
}

#[tokio::test]
async fn test_translate_now_withBlankInput_shouldShowWarningWithoutRequest() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");

    let result = session.translate_now("  ").await;

    assert!(matches!(result, Err(TranslationError::EmptyInput)));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(session.output().text(), output::EMPTY_INPUT_WARNING);
    assert!(session.speech_request().is_err());
}

#[tokio::test]
async fn test_translate_now_withProviderFailure_shouldShowErrorStatus() {
    let provider = MockProvider::failing();
    let session = mock_session(&provider, "en", "tr");

    let result = session.translate_now("hello").await;

    assert!(matches!(result, Err(TranslationError::Network(_))));
    assert_eq!(session.output(), DisplayedOutput::Failure(FailureKind::Network));
    assert_eq!(session.output().text(), output::NETWORK_ERROR);
    assert_eq!(session.clipboard_text(), Err(ActionError::NoTranslation));
    assert!(session.store().list_history().is_empty());
}

#[tokio::test]
async fn test_translate_now_withEmptyProviderResponse_shouldShowEmptyResponseStatus() {
    let provider = MockProvider::empty();
    let session = mock_session(&provider, "en", "tr");

    let result = session.translate_now("hello").await;

    assert!(matches!(result, Err(TranslationError::EmptyResponse)));
    assert_eq!(session.output().text(), output::EMPTY_RESPONSE_ERROR);
}

/// Provider text that looks like a status message is never spoken or copied
#[tokio::test]
async fn test_clipboard_text_withStatusLikeTranslation_shouldRefuse() {
    fn warning_text(_: &TranslationRequest) -> String {
        "⚠️ quota".to_string()
    }
    let provider = MockProvider::working().with_custom_response(warning_text);
    let session = mock_session(&provider, "en", "tr");

    session.translate_now("hello").await.unwrap();

    assert!(session.output().is_translation());
    assert_eq!(session.clipboard_text(), Err(ActionError::NoTranslation));
    assert_eq!(session.speech_request(), Err(ActionError::NoTranslation));
}

#[tokio::test(start_paused = true)]
async fn test_swap_languages_withAutoDetect_shouldRefuseAndKeepSelection() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "auto", "tr");

    assert_eq!(session.swap_languages(), Err(SwapError::AutoDetect));
    assert_eq!(session.language_pair(), LanguagePair::new("auto", "tr"));

    session.set_source_language("en").unwrap();
    assert_eq!(session.swap_languages(), Ok(LanguagePair::new("tr", "en")));
    assert_eq!(session.language_pair(), LanguagePair::new("tr", "en"));

    // Swapping does not trigger a translation
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_set_languages_withInvalidCodes_shouldKeepSelection() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");

    assert!(session.set_target_language("auto").is_err());
    assert!(session.set_target_language("xyz").is_err());
    assert!(session.set_source_language("123").is_err());
    assert_eq!(session.language_pair(), LanguagePair::new("en", "tr"));

    session.set_source_language("auto").unwrap();
    session.set_target_language("fr").unwrap();
    assert_eq!(session.language_pair(), LanguagePair::new("auto", "fr"));

    session.translate_now("hello").await.unwrap();
    assert_eq!(provider.requests()[0].language_pair(), "en|fr");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_pending_withScheduledInput_shouldSkipRequest() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");

    session.schedule_translate("hello");
    assert!(session.cancel_pending());
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(provider.request_count(), 0);
    assert_eq!(session.output(), DisplayedOutput::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_translate_withDroppedSession_shouldNotSendRequest() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");

    session.schedule_translate("hello");
    drop(session);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_subscribe_withTranslation_shouldObserveFinalOutput() {
    let provider = MockProvider::working();
    let session = mock_session(&provider, "en", "tr");
    let mut updates = session.subscribe();

    session.translate_now("hello").await.unwrap();

    assert!(updates.has_changed().unwrap());
    assert_eq!(
        *updates.borrow_and_update(),
        DisplayedOutput::Translation("[tr] hello".to_string())
    );
}
