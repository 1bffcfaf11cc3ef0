use async_trait::async_trait;
use std::time::Duration;

/// Port for suspending execution during rate-limit backoff.
///
/// The fetch loop never sleeps directly; it asks a `Sleeper`, which lets
/// tests record requested delays instead of waiting them out.
///
/// # Examples
///
/// ```no_run
/// use org_issues::domain::ports::{Sleeper, TokioSleeper};
/// use std::time::Duration;
///
/// async fn example() {
///     TokioSleeper.sleep(Duration::from_secs(1)).await;
/// }
/// ```
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
