//! Bounded, cancellable polling.
//!
//! Used to wait for the derived CV analysis to become readable in object storage.
//! Each attempt either yields a value, reports "not yet", or fails; failures and
//! "not yet" are both retried until the attempt cap is reached.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// Doubles after every attempt, never exceeding `max`.
    Exponential { initial: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(interval),
        }
    }

    pub fn exponential(max_attempts: u32, initial: Duration, max: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Exponential { initial, max },
        }
    }

    /// Delay to wait after the `attempt`-th (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(d) => d,
            Backoff::Exponential { initial, max } => {
                let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Cloneable cancellation flag. Every clone observes the same cancellation.
#[derive(Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so `wait_for` cannot fail here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum PollError<E> {
    #[error("gave up after {attempts} attempts")]
    TimedOut {
        attempts: u32,
        last_error: Option<E>,
    },

    #[error("polling cancelled")]
    Cancelled,
}

/// Calls `fetch` until it yields `Some`, the policy's attempt cap is hit, or `cancel`
/// fires. `fetch` receives the 1-based attempt number.
pub async fn poll<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut fetch: F,
) -> Result<T, PollError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: std::fmt::Display,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled);
        }

        match fetch(attempt).await {
            Ok(Some(value)) => {
                debug!("Poll succeeded on attempt {attempt}");
                return Ok(value);
            }
            Ok(None) => debug!("Poll attempt {attempt}: not available yet"),
            Err(e) => {
                debug!("Poll attempt {attempt} failed: {e}");
                last_error = Some(e);
            }
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = tokio::time::sleep(policy.delay_after(attempt)) => {}
            }
        }
    }

    Err(PollError::TimedOut {
        attempts: policy.max_attempts,
        last_error,
    })
}
