//! Testing utilities for msgmux.
//!
//! [`Recorder`] produces handlers that remember every message (and context)
//! they were called with, so tests can check what a dispatcher routed where.
//!
//! ```rust
//! use msgmux::{DispatchMux, Message, testing::Recorder};
//!
//! #[derive(Message, Clone, Debug, PartialEq)]
//! struct OrderCompleted {
//!     order_id: String,
//! }
//!
//! let recorder = Recorder::<OrderCompleted>::new();
//! let mut mux = DispatchMux::new();
//! mux.handle(recorder.handler());
//!
//! let msg = OrderCompleted { order_id: "order-123".into() };
//! mux.dispatch(msg.clone()).unwrap();
//! assert_eq!(recorder.messages(), vec![msg]);
//! ```

use msgmux_core::{Context, Message};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// The error returned by a failing [`Recorder`] handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TestFailure(pub String);

struct Calls<M> {
    messages: Vec<M>,
    contexts: Vec<Context>,
}

/// Records the calls made to the handlers it produces.
///
/// Clones share the same record.
pub struct Recorder<M> {
    calls: Arc<Mutex<Calls<M>>>,
    failure: Option<TestFailure>,
}

impl<M> Clone for Recorder<M> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
            failure: self.failure.clone(),
        }
    }
}

impl<M: Message + Clone> Default for Recorder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message + Clone> Recorder<M> {
    /// A recorder whose handlers succeed.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Calls {
                messages: Vec::new(),
                contexts: Vec::new(),
            })),
            failure: None,
        }
    }

    /// A recorder whose handlers record the call, then fail with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(TestFailure(reason.into())),
            ..Self::new()
        }
    }

    /// A unary handler.
    pub fn handler(&self) -> impl Fn(M) -> Result<(), TestFailure> + Send + Sync + use<M> {
        let recorder = self.clone();
        move |msg: M| {
            recorder.lock().messages.push(msg);
            recorder.outcome()
        }
    }

    /// A context-aware handler. The received context is recorded as well.
    pub fn context_handler(
        &self,
    ) -> impl Fn(&Context, M) -> Result<(), TestFailure> + Send + Sync + use<M> {
        let recorder = self.clone();
        move |ctx: &Context, msg: M| {
            let mut calls = recorder.lock();
            calls.messages.push(msg);
            calls.contexts.push(ctx.clone());
            drop(calls);
            recorder.outcome()
        }
    }

    /// Messages received so far, in call order.
    pub fn messages(&self) -> Vec<M> {
        self.lock().messages.clone()
    }

    /// Contexts received by context-aware handlers, in call order.
    pub fn contexts(&self) -> Vec<Context> {
        self.lock().contexts.clone()
    }

    /// Number of calls received.
    pub fn count(&self) -> usize {
        self.lock().messages.len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut calls = self.lock();
        calls.messages.clear();
        calls.contexts.clear();
    }

    fn outcome(&self) -> Result<(), TestFailure> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Calls<M>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Ping(u32);
    impl Message for Ping {}

    #[test]
    fn test_recorder_counts_and_clears() {
        let recorder = Recorder::<Ping>::new();
        let handler = recorder.handler();
        handler(Ping(1)).unwrap();
        handler(Ping(2)).unwrap();

        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.messages(), vec![Ping(1), Ping(2)]);

        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_failing_recorder_still_records() {
        let recorder = Recorder::<Ping>::failing("boom");
        let handler = recorder.context_handler();

        let err = handler(&Context::background(), Ping(7)).unwrap_err();
        assert_eq!(err, TestFailure("boom".into()));
        assert_eq!(recorder.messages(), vec![Ping(7)]);
        assert!(recorder.contexts()[0].same_as(&Context::background()));
    }
}
