//! Deferred fetch handles
//!
//! A [`Deferred`] is a cloneable handle on one in-flight fetch. The fetch is
//! driven by a detached tokio task, so it runs to completion even when every
//! handle has been dropped; its result is then simply discarded.

use crate::api::http::format_api_error;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a settled fetch
pub type FetchResult<T> = Result<T, Arc<anyhow::Error>>;

/// Observable state of a fetchable entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    /// No fetch was ever issued
    Unfetched,
    Pending,
    Resolved,
    /// Carries a display-safe error message
    Rejected(String),
}

impl FetchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }
}

/// Handle on a spawned fetch
pub struct Deferred<T: Clone> {
    inner: Shared<BoxFuture<'static, FetchResult<T>>>,
}

impl<T: Clone> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn `fut` on the current tokio runtime and return a handle on it
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let inner = fut.map(|result| result.map_err(Arc::new)).boxed().shared();

        let driver = inner.clone();
        tokio::spawn(async move {
            if let Err(e) = driver.await {
                tracing::debug!("Deferred fetch rejected: {:#}", e);
            }
        });

        Self { inner }
    }

    /// A handle that is already resolved with `value`
    pub fn resolved(value: T) -> Self {
        Self::settled(Ok(value))
    }

    /// A handle that is already rejected with `error`
    pub fn rejected(error: anyhow::Error) -> Self {
        Self::settled(Err(Arc::new(error)))
    }

    fn settled(result: FetchResult<T>) -> Self {
        let inner = futures::future::ready(result).boxed().shared();
        // A ready future completes on its first poll
        let _ = inner.clone().now_or_never();
        Self { inner }
    }

    /// Result of the fetch if it has settled
    pub fn peek(&self) -> Option<&FetchResult<T>> {
        self.inner.peek()
    }

    pub fn state(&self) -> FetchState {
        match self.peek() {
            None => FetchState::Pending,
            Some(Ok(_)) => FetchState::Resolved,
            Some(Err(e)) => FetchState::Rejected(format_api_error(e)),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.peek().is_some()
    }

    /// Wait for the fetch to settle
    pub async fn wait(&self) -> FetchResult<T> {
        self.inner.clone().await
    }

    /// True when both handles observe the same fetch
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> fmt::Debug for Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_spawned_deferred_resolves() {
        let deferred = Deferred::spawn(async { Ok(7u32) });
        let value = deferred.wait().await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(deferred.state(), FetchState::Resolved);
    }

    #[tokio::test]
    async fn test_pending_until_completed() {
        let (tx, rx) = oneshot::channel::<u32>();
        let deferred = Deferred::spawn(async move { Ok(rx.await?) });

        assert_eq!(deferred.state(), FetchState::Pending);
        assert!(!deferred.is_settled());

        tx.send(3).unwrap();
        assert_eq!(deferred.wait().await.unwrap(), 3);
        assert!(deferred.is_settled());
    }

    #[tokio::test]
    async fn test_rejected_state_carries_message() {
        let deferred: Deferred<u32> =
            Deferred::spawn(async { Err(anyhow::anyhow!("API request failed: 404 Not Found")) });
        assert!(deferred.wait().await.is_err());
        assert_eq!(
            deferred.state(),
            FetchState::Rejected("Resource not found.".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_completes_after_handles_are_dropped() {
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let deferred = Deferred::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = done_tx.send(());
            Ok(())
        });
        drop(deferred);

        tokio::time::timeout(Duration::from_secs(1), done_rx)
            .await
            .expect("fetch should not be cancelled")
            .unwrap();
    }

    #[test]
    fn test_clones_share_identity() {
        let a = Deferred::resolved(1u8);
        let b = a.clone();
        let c = Deferred::resolved(1u8);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_settled_constructors() {
        assert_eq!(Deferred::resolved("x").state(), FetchState::Resolved);
        let rejected: Deferred<u8> = Deferred::rejected(anyhow::anyhow!("boom"));
        assert_eq!(rejected.state(), FetchState::Rejected("boom".to_string()));
    }
}
