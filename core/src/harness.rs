//! Live API Test Harness
//!
//! Helpers for tests that call real LLM providers: request spacing, retries
//! with backoff for transient failures, a per-attempt timeout and a running
//! cost budget so a misbehaving test run cannot burn through credits.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;

/// Limits for a harness run
#[derive(Clone, Debug, PartialEq)]
pub struct HarnessConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base backoff; attempt `n` waits `n * retry_delay` plus jitter
    pub retry_delay: Duration,
    /// Timeout for each attempt
    pub request_timeout: Duration,
    /// Minimum spacing between successful requests
    pub rate_limit: Duration,
    /// Budget for the whole run
    pub max_cost_usd: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            rate_limit: Duration::from_secs(1),
            max_cost_usd: 0.10,
        }
    }
}

/// Harness failures
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Every attempt failed, or a non-retryable error stopped the run
    #[error("operation failed after {retries} retries: {last}")]
    Exhausted {
        /// Configured retry count
        retries: u32,
        /// Message of the last failure
        last: String,
    },

    /// The next request would exceed the budget
    #[error("estimated cost ({estimated:.4} USD) would exceed limit ({limit:.4} USD)")]
    CostLimit {
        /// Running total including the rejected request
        estimated: f64,
        /// Configured budget
        limit: f64,
    },
}

/// Stateful runner shared by the live tests of one process
#[derive(Debug)]
pub struct ApiTestRunner {
    config: HarnessConfig,
    request_count: u32,
    total_cost: f64,
    last_request: Option<Instant>,
}

impl ApiTestRunner {
    /// Runner with the given limits
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            request_count: 0,
            total_cost: 0.0,
            last_request: None,
        }
    }

    /// Run `operation` with spacing, timeout and retries
    ///
    /// Transient failures (see [`is_retryable_error`]) and timeouts are
    /// retried with linear backoff plus up to one second of jitter; any other
    /// failure stops immediately.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Exhausted`] carrying the last failure message.
    pub async fn execute_with_retry<T, E, F, Fut>(&mut self, mut operation: F) -> Result<T, HarnessError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.config.rate_limit {
                tokio::time::sleep(self.config.rate_limit - elapsed).await;
            }
        }

        let mut last_error = String::new();
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
                tokio::time::sleep(self.config.retry_delay * attempt + jitter).await;
            }

            match tokio::time::timeout(self.config.request_timeout, operation()).await {
                Ok(Ok(value)) => {
                    self.request_count += 1;
                    self.last_request = Some(Instant::now());
                    return Ok(value);
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = format!("timeout after {:?}", self.config.request_timeout);
                }
            }

            tracing::debug!(attempt, error = %last_error, "Live API attempt failed");
            if !is_retryable_error(&last_error) {
                break;
            }
        }

        Err(HarnessError::Exhausted {
            retries: self.config.max_retries,
            last: last_error,
        })
    }

    /// Reserve budget for one request
    ///
    /// # Errors
    ///
    /// [`HarnessError::CostLimit`] if the running total would exceed the
    /// budget; nothing is reserved in that case.
    pub fn estimate_and_check_cost(
        &mut self,
        provider: &str,
        prompt_tokens: u32,
        max_tokens: u32,
    ) -> Result<(), HarnessError> {
        let estimated = self.total_cost + estimate_api_cost(provider, prompt_tokens, max_tokens);
        if estimated > self.config.max_cost_usd {
            return Err(HarnessError::CostLimit {
                estimated,
                limit: self.config.max_cost_usd,
            });
        }
        self.total_cost = estimated;
        Ok(())
    }

    /// Successful requests and reserved cost so far
    #[must_use]
    pub fn stats(&self) -> (u32, f64) {
        (self.request_count, self.total_cost)
    }
}

/// Rough USD cost of one request, from per-1k-token rates
#[must_use]
pub fn estimate_api_cost(provider: &str, prompt_tokens: u32, max_tokens: u32) -> f64 {
    let per_thousand = match provider {
        "openai" => 0.002,
        "anthropic" => 0.008,
        "google" => 0.001,
        _ => 0.01,
    };
    f64::from(prompt_tokens + max_tokens) / 1000.0 * per_thousand
}

/// Whether an error message describes a transient failure
#[must_use]
pub fn is_retryable_error(message: &str) -> bool {
    const RETRYABLE: &[&str] = &[
        "rate limit",
        "timeout",
        "temporary failure",
        "connection refused",
        "network error",
        "500",
        "502",
        "503",
        "504",
    ];

    let lower = message.to_lowercase();
    RETRYABLE.iter().any(|needle| lower.contains(needle))
}
