//! Request pacing and retry utilities shared by every external source.
//!
//! [`Pacer`] enforces the jittered gap between consecutive requests to one
//! source, even when several workers share it. [`retry_with_backoff`]
//! retries transient HTTP failures; non-retriable errors propagate at once.

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;

use crate::error::ScraperError;

/// Spaces out requests to a single source by a random delay drawn from
/// `[min, max]`.
///
/// The first call returns immediately. Callers sharing one `Pacer` queue on
/// its lock, so the gap holds across concurrent workers.
#[derive(Debug)]
pub struct Pacer {
    min: Duration,
    max: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pacer {
    #[must_use]
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_delay_ms.min(max_delay_ms)),
            max: Duration::from_millis(max_delay_ms.max(min_delay_ms)),
            last_request: Mutex::new(None),
        }
    }

    /// A pacer that never sleeps; for tests and offline sources.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    /// Wait until the jittered gap since the previous request has elapsed,
    /// then record this request.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let gap = self.next_gap();
            let elapsed = previous.elapsed();
            if elapsed < gap {
                tokio::time::sleep(gap - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn next_gap(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        // Millisecond bounds came in as u64, so the casts round-trip.
        #[allow(clippy::cast_possible_truncation)]
        let (lo, hi) = (self.min.as_millis() as u64, self.max.as_millis() as u64);
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable: [`ScraperError::RateLimited`], [`ScraperError::Http`], and 5xx
/// [`ScraperError::UnexpectedStatus`]. Everything else is returned at once.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for
/// `backoff_base_secs * 2^attempt` seconds and tries again, up to
/// `max_retries` additional attempts. If all retries are exhausted the last
/// error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let last_err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient source error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
