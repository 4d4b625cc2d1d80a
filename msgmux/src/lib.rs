//! # msgmux - Type-Keyed Message Dispatch
//!
//! `msgmux` routes plain message structs to exactly one handler per message
//! type. Producers build typed values and dispatch them; consumers register a
//! function per message type without sharing an interface.
//!
//! ## Quick Start
//!
//! ```rust
//! use msgmux::{BoxError, DispatchError, DispatchMux, Message};
//!
//! #[derive(Message)]
//! struct OrderCompleted {
//!     order_id: String,
//! }
//!
//! #[derive(Message)]
//! struct ShipOrder {
//!     order_id: String,
//! }
//!
//! let mut mux = DispatchMux::new();
//! mux.handle(|e: OrderCompleted| -> Result<(), BoxError> {
//!     println!("completed {}", e.order_id);
//!     Ok(())
//! });
//!
//! mux.dispatch(OrderCompleted { order_id: "order-123".into() }).unwrap();
//!
//! let err = mux.dispatch(ShipOrder { order_id: "order-123".into() }).unwrap_err();
//! assert!(matches!(err, DispatchError::NoHandlerRegistered(_)));
//! ```
//!
//! ## Handlers
//!
//! A handler is a function or closure of one of two shapes:
//!
//! - `Fn(M) -> Result<(), E>`
//! - `Fn(&Context, M) -> Result<(), E>`
//!
//! `M` must be a message record and `E` anything convertible into
//! [`BoxError`]. Anything else is rejected by the compiler, except a
//! non-record message parameter, which [`DispatchMux::handle`] rejects with a
//! panic:
//!
//! ```rust,should_panic
//! use msgmux::{BoxError, DispatchMux};
//!
//! let mut mux = DispatchMux::new();
//! mux.handle(|_: String| -> Result<(), BoxError> { Ok(()) });
//! ```
//!
//! Handlers without a return value do not compile:
//!
//! ```compile_fail
//! use msgmux::{DispatchMux, Message};
//!
//! #[derive(Message)]
//! struct Ping;
//!
//! let mut mux = DispatchMux::new();
//! mux.handle(|_: Ping| {});
//! ```
//!
//! Neither do handlers without parameters:
//!
//! ```compile_fail
//! use msgmux::{BoxError, DispatchMux};
//!
//! let mut mux = DispatchMux::new();
//! mux.handle(|| -> Result<(), BoxError> { Ok(()) });
//! ```
//!
//! Only structs can derive `Message`:
//!
//! ```compile_fail
//! use msgmux::Message;
//!
//! #[derive(Message)]
//! enum OrderEvent {
//!     Completed,
//!     Cancelled,
//! }
//! ```
//!
//! ```compile_fail
//! use msgmux::Message;
//!
//! #[derive(Message)]
//! union RawPayload {
//!     word: u32,
//!     bytes: [u8; 4],
//! }
//! ```
//!
//! ## Errors
//!
//! Registration mistakes are bugs in the program's wiring and panic.
//! Dispatch returns [`DispatchError`]; a handler's own error comes back
//! unchanged inside [`DispatchError::Handler`].
//!
//! ## Features
//!
//! - `macros` (default): re-exports `#[derive(Message)]`.
//! - `tracing` (default): emits `tracing` events for registration and
//!   dispatch.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod invoker;
mod mux;
pub mod testing;

pub use msgmux_core::{
    // Errors
    BoxError,
    // Context
    CancelHandle,
    Context,
    ContextError,
    DispatchError,
    // Handlers
    HandlerFn,
    HandlerOutput,
    HandlerShape,
    IntoHandler,
    // Message
    Message,
    MessageKind,
    MessageType,
    ParamPosition,
    RegistrationError,
    Signature,
    validate,
};

pub use mux::{DispatchMux, HandlerEntry};

#[cfg(feature = "macros")]
pub use msgmux_macros::Message;

/// Prelude module - common imports for msgmux.
///
/// # Usage
///
/// ```rust
/// use msgmux::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Context, DispatchError, DispatchMux, IntoHandler, Message, RegistrationError,
    };
}
