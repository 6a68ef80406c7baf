use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Waits between retry attempts. Swapped out in tests to observe the schedule.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Linear backoff: 1s, 3s, 5s, ...
pub fn linear_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 + u64::from(attempt) * 2)
}

/// Run `op` up to `max_attempts` times, sleeping [`linear_backoff`] between
/// attempts. Errors rejected by `is_retryable` and the last error are
/// returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    name: &str,
    max_attempts: u32,
    sleeper: &dyn Sleeper,
    is_retryable: R,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < max_attempts && is_retryable(&e) => {
                let delay = linear_backoff(attempt);
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    name,
                    attempt + 1,
                    max_attempts,
                    e,
                    delay
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
