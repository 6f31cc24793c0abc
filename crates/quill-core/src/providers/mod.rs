//! External collaborator interfaces.
//!
//! The engine treats inference and search as opaque async functions behind
//! traits. Concrete clients live in submodules; stages apply the configured
//! retry policy at the call site before escalating a failure.

pub mod groq;
pub mod serper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::config::RetryPolicy;
use crate::error::ProviderError;

/// One document returned by the search collaborator. The query is attached
/// later by the Web Searcher when results are merged into state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDoc {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Opaque language-model inference: prompt in, completion out.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate a completion for `user_content` under `role_prompt`.
    async fn complete(
        &self,
        role_prompt: &str,
        user_content: &str,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

/// Opaque web search: query in, ranked documents out. An empty result set is
/// a valid answer, not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query, returning at most `max_results` documents.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchDoc>, ProviderError>;
}

/// Run a collaborator call under the given retry policy: bounded attempts
/// with exponential backoff, then escalate the last error.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut call: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut delay = Duration::from_millis(policy.base_delay_ms);

    for attempt in 1..=attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    what,
                    attempt,
                    error = %err,
                    "collaborator call failed, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }

    unreachable!("retry loop always returns within the attempt budget")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn with_retry_returns_first_success() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
        };
        let calls = AtomicUsize::new(0);

        let out = with_retry(&policy, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(ProviderError::InferenceUnavailable("flaky".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(out, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn with_retry_escalates_after_budget() {
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay_ms: 1,
        };
        let calls = AtomicUsize::new(0);

        let out: Result<(), _> = with_retry(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::InferenceUnavailable("down".into())) }
        })
        .await;

        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
