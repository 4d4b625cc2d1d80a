//! # Cancellation Context
//!
//! A [`Context`] is the call scope a context-aware handler receives: it can
//! be cancelled and it may carry a deadline. The dispatcher only passes it
//! through; honoring it is up to the handler.
//!
//! ```rust
//! use msgmux_core::{Context, ContextError};
//! use std::time::Duration;
//!
//! let (ctx, cancel) = Context::background().with_timeout(Duration::from_secs(5));
//! assert!(ctx.check().is_ok());
//!
//! cancel.cancel();
//! assert_eq!(ctx.err(), Some(ContextError::Canceled));
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};
use std::time::{Duration, Instant};
use thiserror::Error;

static BACKGROUND: LazyLock<Context> = LazyLock::new(|| Context {
    inner: Arc::new(Inner {
        parent: None,
        deadline: None,
        cause: OnceLock::new(),
    }),
});

/// Why a context is done.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context was cancelled through its [`CancelHandle`].
    #[error("context canceled")]
    Canceled,

    /// The context's deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// A cancellable, optionally deadline-bearing call scope.
///
/// Cloning is cheap and yields the same instance (see [`Context::same_as`]).
/// A derived context is done as soon as its parent is.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    parent: Option<Context>,
    deadline: Option<Instant>,
    cause: OnceLock<ContextError>,
}

impl Context {
    /// The root context: never cancelled, no deadline.
    ///
    /// Every call returns the same instance.
    pub fn background() -> Self {
        BACKGROUND.clone()
    }

    /// Derive a child that can be cancelled independently of `self`.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        self.derive(self.deadline())
    }

    /// Derive a child that expires at `deadline`, or earlier if `self` does.
    pub fn with_deadline(&self, deadline: Instant) -> (Context, CancelHandle) {
        let effective = match self.deadline() {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };
        self.derive(Some(effective))
    }

    /// Derive a child that expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> (Context, CancelHandle) {
        self.with_deadline(Instant::now() + timeout)
    }

    fn derive(&self, deadline: Option<Instant>) -> (Context, CancelHandle) {
        let child = Context {
            inner: Arc::new(Inner {
                parent: Some(self.clone()),
                deadline,
                cause: OnceLock::new(),
            }),
        };
        let handle = CancelHandle {
            target: child.clone(),
        };
        (child, handle)
    }

    /// The point in time at which this context expires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// `None` while the context is live, otherwise the reason it is done.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(cause) = self.inner.cause.get() {
            return Some(*cause);
        }
        if let Some(cause) = self.inner.parent.as_ref().and_then(Context::err) {
            return Some(cause);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Returns `true` once the context is cancelled or expired.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// `Err` once the context is done, for use with `?` inside handlers.
    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(cause) => Err(cause),
            None => Ok(()),
        }
    }

    /// Returns `true` if both handles refer to the same context instance.
    pub fn same_as(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.inner.deadline)
            .field("err", &self.err())
            .finish()
    }
}

/// Cancels the context it was created with.
///
/// Dropping the handle does not cancel.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    target: Context,
}

impl CancelHandle {
    /// Cancel the context and everything derived from it.
    ///
    /// Only the first call has an effect. A context whose deadline already
    /// passed keeps reporting [`ContextError::DeadlineExceeded`].
    pub fn cancel(&self) {
        let cause = match self.target.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => ContextError::DeadlineExceeded,
            _ => ContextError::Canceled,
        };
        let _ = self.target.inner.cause.set(cause);
    }
}
