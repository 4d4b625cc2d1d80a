//! # msgmux-core
//!
//! Core types for the msgmux message dispatcher.
//!
//! This crate has minimal dependencies and is meant for crates that define
//! messages or handlers without depending on the dispatcher itself. Such
//! crates implement [`Message`] by hand (`impl Message for MyStruct {}`);
//! `#[derive(Message)]` expands to paths in the `msgmux` crate and needs it
//! as a dependency.
//!
//! # Building Blocks
//!
//! - [`Message`] - marker for dispatchable values, classified by [`MessageKind`]
//!   and identified by [`MessageType`]
//! - [`Context`] - the cancellation scope handed to context-aware handlers
//! - [`IntoHandler`] / [`validate`] - the handler shape rules and the
//!   extraction of the message type a handler accepts
//!
//! # Error Types
//!
//! - [`RegistrationError`] - wiring mistakes, fatal in `DispatchMux::handle`
//! - [`DispatchError`] - recoverable failures of a single dispatch
//! - [`ContextError`] - why a [`Context`] is done

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod message;

// Re-exports
pub use context::{CancelHandle, Context, ContextError};
pub use error::{BoxError, DispatchError, ParamPosition, RegistrationError};
pub use handler::{HandlerFn, HandlerOutput, HandlerShape, IntoHandler, Signature, validate};
pub use message::{Message, MessageKind, MessageType};
