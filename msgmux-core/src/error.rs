//! Error types for msgmux.
//!
//! The two enums mirror the two fault classes of the dispatcher:
//!
//! - [`RegistrationError`] - wiring mistakes found while registering handlers.
//!   `DispatchMux::handle` turns these into a panic.
//! - [`DispatchError`] - ordinary, recoverable failures of a single dispatch.

use crate::message::{MessageKind, MessageType};
use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which handler parameter holds the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPosition {
    /// The only parameter of a unary handler.
    Sole,
    /// The parameter following the context in a context-aware handler.
    Second,
}

impl fmt::Display for ParamPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamPosition::Sole => "input",
            ParamPosition::Second => "2nd input",
        })
    }
}

/// Errors detected while registering a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The handler's message parameter is not a record type.
    #[error("handler {position} parameter should be a record (got: {kind} `{message}`)")]
    NotARecord {
        /// The rejected parameter type.
        message: MessageType,
        /// Its structural class.
        kind: MessageKind,
        /// Where it sits in the handler signature.
        position: ParamPosition,
    },

    /// A handler for this message type is already registered.
    #[error("handler for message {0} already registered")]
    DuplicateHandler(MessageType),
}

/// Errors returned by a dispatch call.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The dispatched value is not a record.
    #[error("message should be a record (got: {kind} `{message}`)")]
    InvalidMessageShape {
        /// The dispatched type.
        message: MessageType,
        /// Its structural class.
        kind: MessageKind,
    },

    /// Handlers exist, but none for this message type.
    #[error("no handler registered for message {0}")]
    NoHandlerRegistered(MessageType),

    /// The handler ran and reported a failure.
    #[error(transparent)]
    Handler(BoxError),
}

impl DispatchError {
    /// Returns `true` if the handler itself failed.
    pub fn is_handler_error(&self) -> bool {
        matches!(self, DispatchError::Handler(_))
    }

    /// The error reported by the handler, if any.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DispatchError::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Consumes `self`, returning the handler's own error value.
    ///
    /// Use [`Box::downcast`] on the result to recover the concrete type the
    /// handler returned.
    pub fn into_handler_error(self) -> Option<BoxError> {
        match self {
            DispatchError::Handler(err) => Some(err),
            _ => None,
        }
    }
}
