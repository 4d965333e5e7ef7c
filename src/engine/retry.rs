// src/engine/retry.rs

//! Bounded retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};

/// Run `fetch` up to `max_attempts` times, sleeping `k * 1s` between
/// attempt `k` and `k + 1`.
///
/// The backoff sleep races the cancellation token, so a cancelled
/// caller gets `AppError::Cancelled` back within the current tick
/// instead of waiting out the backoff. A `Cancelled` error from the
/// fetch itself is never retried; every other error is.
pub async fn fetch_with_retry<T, F, Fut>(
    max_attempts: u32,
    cancel: &CancellationToken,
    mut fetch: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        match fetch().await {
            Ok(value) => return Ok(value),
            Err(AppError::Cancelled) => return Err(AppError::Cancelled),
            Err(error) if attempt == max_attempts => {
                return Err(AppError::RetriesExhausted {
                    attempts: max_attempts,
                    source: Box::new(error),
                });
            }
            Err(error) => {
                log::warn!("Fetch attempt {attempt}/{max_attempts} failed: {error}");
            }
        }

        let backoff = Duration::from_secs(u64::from(attempt));
        tokio::select! {
            () = tokio::time::sleep(backoff) => {}
            () = cancel.cancelled() => return Err(AppError::Cancelled),
        }

        attempt += 1;
    }
}
