use crate::error::ProviderError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff with jitter, 2 retries, base delay 2s. Schema errors
/// get exactly one fallback retry instead — callers that need that shape
/// (only `arc-xai` does) implement it themselves rather than going through
/// this helper.
pub async fn with_backoff<F, Fut>(mut operation: F) -> Result<crate::response::AnalysisResponse, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<crate::response::AnalysisResponse, ProviderError>>,
{
    const MAX_RETRIES: u32 = 2;
    const BASE_DELAY: Duration = Duration::from_secs(2);

    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(response) => return Ok(response),
            Err(err) if err.is_retryable() && attempt < MAX_RETRIES => {
                let backoff = err.retry_after().unwrap_or_else(|| {
                    let exp = BASE_DELAY * 2u32.pow(attempt);
                    let jitter_ms = rand::thread_rng().gen_range(0..250);
                    exp + Duration::from_millis(jitter_ms)
                });
                log::warn!(
                    "retrying {} call after {:?} (attempt {}/{})",
                    err.provider(),
                    backoff,
                    attempt + 1,
                    MAX_RETRIES
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{AnalysisResponse, AnalysisStatus, TokenUsage};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn stub_response() -> AnalysisResponse {
        AnalysisResponse {
            raw_text: String::new(),
            predicted_output: None,
            multi_test_prediction_grids: None,
            pattern_description: String::new(),
            solving_strategy: String::new(),
            hints: vec![],
            confidence: 0,
            usage: TokenUsage::default(),
            reasoning_log: None,
            reasoning_items: vec![],
            status: AnalysisStatus::Complete,
            incomplete_reason: None,
            provider_response_id: None,
            provider_raw_response: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_backoff(move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(ProviderError::RateLimit {
                        provider: "openai".into(),
                        message: "rate limited".into(),
                        retry_after: Some(Duration::from_millis(1)),
                    })
                } else {
                    Ok(stub_response())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_auth_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_backoff(move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::Auth {
                    provider: "openai".into(),
                    message: "bad key".into(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
