//! One abandonable login attempt.
//!
//! A [`LoginAttempt`] owns the handler a plugin created for it. Running the
//! attempt resolves exactly once; an [`AbandonHandle`] taken before the run
//! lets the host walk away from it (the user navigated elsewhere, the dialog
//! closed) without ever receiving the user context.
//!
//! ```
//! # use async_trait::async_trait;
//! # use vantage_auth::*;
//! struct Instant;
//!
//! #[async_trait]
//! impl AuthHandler for Instant {
//!     async fn attempt_login(&mut self, _: &LoginContext) -> Result<UserContext, AuthError> {
//!         Ok(UserContext::new(SessionToken::new("t"), User::new("guest")))
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let attempt = LoginAttempt::new(CapabilityId::ANONYMOUS, Box::new(Instant), LoginContext::new());
//! let abandon = attempt.abandon_handle();
//! let user = attempt.run().await.unwrap();
//! assert_eq!(user.user.name, "guest");
//! assert!(!abandon.abandon());
//! # });
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::Instrument;

use crate::capability::CapabilityId;
use crate::context::LoginContext;
use crate::error::AuthError;
use crate::plugin::AuthHandler;
use crate::user::UserContext;

/// Releases the handler exactly once, including when the attempt is dropped
/// without running or mid-run. Dropping it also closes the abandon window.
struct HandlerGuard {
    handler: Box<dyn AuthHandler>,
    released: bool,
    abandon_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl HandlerGuard {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.handler.release();
        }
    }
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        self.release();
        self.abandon_tx.lock().take();
    }
}

/// A login attempt against one selected plugin.
pub struct LoginAttempt {
    capability: CapabilityId,
    guard: HandlerGuard,
    context: LoginContext,
    abandon_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
    abandon_rx: oneshot::Receiver<()>,
}

impl LoginAttempt {
    /// Wrap a handler created for `context`.
    pub fn new(
        capability: CapabilityId,
        handler: Box<dyn AuthHandler>,
        context: LoginContext,
    ) -> Self {
        let (abandon_tx, abandon_rx) = oneshot::channel();
        let abandon_tx = Arc::new(Mutex::new(Some(abandon_tx)));
        Self {
            capability,
            guard: HandlerGuard {
                handler,
                released: false,
                abandon_tx: abandon_tx.clone(),
            },
            context,
            abandon_tx,
            abandon_rx,
        }
    }

    /// The capability being attempted.
    pub fn capability(&self) -> &CapabilityId {
        &self.capability
    }

    /// A handle that abandons this attempt.
    pub fn abandon_handle(&self) -> AbandonHandle {
        AbandonHandle {
            abandon_tx: self.abandon_tx.clone(),
        }
    }

    /// Run the handler to completion or until abandoned.
    ///
    /// Resolves exactly once. Once [`AbandonHandle::abandon`] has returned
    /// `true`, this resolves to [`AuthError::Abandoned`] even if the handler
    /// produced a user context in the meantime. The handler is released before
    /// this returns.
    pub async fn run(self) -> Result<UserContext, AuthError> {
        let span = tracing::info_span!(
            target: "vantage_auth::login",
            "vantage::login",
            capability = %self.capability
        );
        self.run_inner().instrument(span).await
    }

    async fn run_inner(self) -> Result<UserContext, AuthError> {
        let Self {
            capability,
            mut guard,
            context,
            abandon_tx,
            mut abandon_rx,
        } = self;

        tracing::debug!(target: "vantage_auth::login", "login attempt started");

        let outcome = {
            let login = guard.handler.attempt_login(&context);
            tokio::select! {
                biased;
                _ = &mut abandon_rx => Err(AuthError::Abandoned),
                result = login => result,
            }
        };

        // Closing the abandon window; an abandon that won the race after the
        // handler finished still suppresses the result.
        let outcome = match abandon_tx.lock().take() {
            Some(_) => outcome,
            None => Err(AuthError::Abandoned),
        };
        guard.release();

        match &outcome {
            Ok(user) => tracing::info!(
                target: "vantage_auth::login",
                %capability,
                user = %user.user.name,
                "login succeeded"
            ),
            Err(AuthError::Abandoned) => {
                tracing::debug!(target: "vantage_auth::login", %capability, "login abandoned")
            }
            Err(err) => tracing::warn!(
                target: "vantage_auth::login",
                %capability,
                error = %err,
                recoverable = err.is_recoverable(),
                "login failed"
            ),
        }
        outcome
    }
}

impl std::fmt::Debug for LoginAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginAttempt")
            .field("capability", &self.capability)
            .field("pending", &self.abandon_tx.lock().is_some())
            .finish_non_exhaustive()
    }
}

/// Abandons a pending [`LoginAttempt`].
///
/// Cloneable; every clone controls the same attempt.
#[derive(Clone)]
pub struct AbandonHandle {
    abandon_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AbandonHandle {
    /// Abandon the attempt.
    ///
    /// Returns `true` if this call abandoned it, `false` if the attempt already
    /// resolved, was already abandoned, or was dropped.
    pub fn abandon(&self) -> bool {
        if let Some(tx) = self.abandon_tx.lock().take() {
            tx.send(()).is_ok()
        } else {
            false
        }
    }

    /// Whether the attempt can still be abandoned.
    pub fn is_pending(&self) -> bool {
        self.abandon_tx.lock().is_some()
    }
}

impl std::fmt::Debug for AbandonHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbandonHandle")
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{SessionToken, User};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        attempts: AtomicUsize,
        releases: AtomicUsize,
    }

    enum Behavior {
        Succeed,
        Fail,
        Hang,
    }

    struct FakeHandler {
        counters: Arc<Counters>,
        behavior: Behavior,
    }

    #[async_trait]
    impl AuthHandler for FakeHandler {
        async fn attempt_login(
            &mut self,
            _context: &LoginContext,
        ) -> Result<UserContext, AuthError> {
            self.counters.attempts.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => {
                    Ok(UserContext::new(SessionToken::new("tok"), User::new("ada")))
                }
                Behavior::Fail => Err(AuthError::InvalidCredentials),
                Behavior::Hang => std::future::pending().await,
            }
        }

        fn release(&mut self) {
            self.counters.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn attempt(behavior: Behavior) -> (LoginAttempt, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let handler = FakeHandler {
            counters: counters.clone(),
            behavior,
        };
        (
            LoginAttempt::new(CapabilityId::PSK, Box::new(handler), LoginContext::new()),
            counters,
        )
    }

    #[tokio::test]
    async fn test_success_releases_once() {
        let (attempt, counters) = attempt(Behavior::Succeed);
        let handle = attempt.abandon_handle();
        assert!(handle.is_pending());

        let user = attempt.run().await.unwrap();
        assert_eq!(user.user.name, "ada");
        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
        assert!(!handle.is_pending());
        assert!(!handle.abandon());
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let (attempt, counters) = attempt(Behavior::Fail);
        let err = attempt.run().await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(err.is_recoverable());
        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abandon_before_run_skips_handler() {
        let (attempt, counters) = attempt(Behavior::Succeed);
        let handle = attempt.abandon_handle();

        assert!(handle.abandon());
        assert!(!handle.abandon());

        assert_eq!(attempt.run().await.unwrap_err(), AuthError::Abandoned);
        assert_eq!(counters.attempts.load(Ordering::SeqCst), 0);
        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abandon_mid_flight() {
        let (attempt, counters) = attempt(Behavior::Hang);
        let handle = attempt.abandon_handle();
        let other = handle.clone();

        let (result, abandoned) = tokio::join!(attempt.run(), async move {
            tokio::task::yield_now().await;
            other.abandon()
        });

        assert!(abandoned);
        assert_eq!(result.unwrap_err(), AuthError::Abandoned);
        assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
        assert!(!handle.abandon());
    }

    #[test]
    fn test_dropped_attempt_releases_handler() {
        let (attempt, counters) = attempt(Behavior::Succeed);
        let handle = attempt.abandon_handle();
        assert!(handle.is_pending());
        drop(attempt);

        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
        assert!(!handle.is_pending());
        assert!(!handle.abandon());
    }

    #[tokio::test]
    async fn test_dropping_run_mid_flight_closes_abandon_window() {
        let (attempt, counters) = attempt(Behavior::Hang);
        let handle = attempt.abandon_handle();

        let run = attempt.run();
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), run).await;

        assert!(timed_out.is_err());
        assert_eq!(counters.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
        assert!(!handle.is_pending());
        assert!(!handle.abandon());
    }
}
