//! Cooperative cancellation and deadlines for API calls.
//!
//! A [`Context`] bounds every suspension point of a call: the HTTP exchange
//! and the sleep between retries. Once the context is done no further
//! attempt starts and the call returns [`Error::Cancelled`] or
//! [`Error::DeadlineExceeded`].
//!
//! Dropping the future returned by a client method also cancels the call.
//! A context is for cancelling from elsewhere, or for a deadline that spans
//! all retries of a call.

use crate::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// A cloneable handle that cancels every call observing it.
///
/// # Examples
///
/// ```
/// use mailbreeze::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// assert!(!observer.is_cancelled());
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only fails if it was
        // dropped, which cannot happen while we hold a reference.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Cancellation and deadline scope for API calls.
///
/// # Examples
///
/// ```no_run
/// use mailbreeze::{CancellationToken, Client, Context};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), mailbreeze::Error> {
/// let token = CancellationToken::new();
/// let ctx = Context::background()
///     .with_cancellation(token.clone())
///     .with_timeout(Duration::from_secs(10));
///
/// let client = Client::new("sk_live_xxx")?.with_context(ctx);
/// let stats = client.emails().stats().await?;
/// println!("sent {}", stats.sent);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never done.
    pub fn background() -> Self {
        Self::default()
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets an absolute deadline, keeping the earlier one if already set.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets a deadline `timeout` from now.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the error the context is done with, or `None` if it is live.
    ///
    /// Cancellation is reported before an expired deadline.
    pub fn err(&self) -> Option<Error> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves with the terminating error once the context is done.
    ///
    /// Never resolves for a background context.
    pub async fn done(&self) -> Error {
        let cancelled = async {
            match &self.token {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Error::Cancelled,
            _ = expired => Error::DeadlineExceeded,
        }
    }

    /// Runs `fut` unless the context finishes first.
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, Error>
    where
        F: std::future::Future<Output = T>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_never_done() {
        assert!(Context::background().err().is_none());
    }

    #[test]
    fn test_cancelled_token_reports_cancelled() {
        let token = CancellationToken::new();
        let ctx = Context::background().with_cancellation(token.clone());
        token.cancel();
        assert!(matches!(ctx.err(), Some(Error::Cancelled)));
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = Context::background()
            .with_deadline(now + Duration::from_secs(5))
            .with_deadline(now + Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let ctx = Context::background().with_timeout(Duration::ZERO);
        assert!(matches!(ctx.err(), Some(Error::DeadlineExceeded)));
        let out = ctx.run(async { 1 }).await;
        assert!(matches!(out, Err(Error::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_sleep() {
        let token = CancellationToken::new();
        let ctx = Context::background().with_cancellation(token.clone());

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let out = ctx.run(tokio::time::sleep(Duration::from_secs(30))).await;
        assert!(matches!(out, Err(Error::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_unrepresentable_timeout_adds_no_deadline() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());

        let ctx = Context::background()
            .with_timeout(Duration::from_secs(5))
            .with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_some());
    }

    #[tokio::test]
    async fn test_run_completes_when_live() {
        let ctx = Context::background().with_timeout(Duration::from_secs(30));
        assert_eq!(ctx.run(async { 7 }).await.unwrap(), 7);
    }
}
