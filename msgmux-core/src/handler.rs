//! # Handler Validation
//!
//! A handler is a plain function or closure in one of two shapes:
//!
//! 1. **Unary**: `Fn(M) -> Result<(), E>`
//! 2. **With context**: `Fn(&Context, M) -> Result<(), E>`
//!
//! where `M` is a record [`Message`] and `E: Into<BoxError>`.
//!
//! Most of the shape rules are checked by the compiler through
//! [`IntoHandler`] and [`HandlerOutput`]: a value that is not callable, takes
//! zero or more than two arguments, takes something other than `&Context`
//! first, or returns anything but a single `Result<(), E>` does not implement
//! [`IntoHandler`] and is rejected where it is registered. The one rule left
//! for runtime is the record check, since primitives and collections also
//! implement [`Message`]; [`validate`] performs it.
//!
//! Not callable:
//!
//! ```compile_fail
//! use msgmux_core::{IntoHandler, validate};
//! fn check<H: IntoHandler<A>, A>(_: H) { let _ = validate::<H, A>(); }
//! check(42u32);
//! ```
//!
//! Three parameters:
//!
//! ```compile_fail
//! use msgmux_core::{BoxError, Context, IntoHandler, Message, validate};
//! struct Ping;
//! impl Message for Ping {}
//! fn check<H: IntoHandler<A>, A>(_: H) { let _ = validate::<H, A>(); }
//! check(|_: &Context, _: Ping, _: Ping| -> Result<(), BoxError> { Ok(()) });
//! ```
//!
//! First parameter is not a context:
//!
//! ```compile_fail
//! use msgmux_core::{BoxError, IntoHandler, Message, validate};
//! struct Ping;
//! impl Message for Ping {}
//! fn check<H: IntoHandler<A>, A>(_: H) { let _ = validate::<H, A>(); }
//! check(|_: &str, _: Ping| -> Result<(), BoxError> { Ok(()) });
//! ```
//!
//! Return value is not an error:
//!
//! ```compile_fail
//! use msgmux_core::{IntoHandler, Message, validate};
//! struct Ping;
//! impl Message for Ping {}
//! fn check<H: IntoHandler<A>, A>(_: H) { let _ = validate::<H, A>(); }
//! check(|_: Ping| -> bool { true });
//! ```

use crate::context::Context;
use crate::error::{BoxError, ParamPosition, RegistrationError};
use crate::message::{Message, MessageType};

/// The two accepted handler shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerShape {
    /// `Fn(M) -> Result<(), E>`
    Unary,
    /// `Fn(&Context, M) -> Result<(), E>`
    WithContext,
}

impl HandlerShape {
    /// Number of parameters the handler takes.
    pub const fn arity(self) -> usize {
        match self {
            HandlerShape::Unary => 1,
            HandlerShape::WithContext => 2,
        }
    }

    /// Position of the message parameter.
    pub const fn message_position(self) -> ParamPosition {
        match self {
            HandlerShape::Unary => ParamPosition::Sole,
            HandlerShape::WithContext => ParamPosition::Second,
        }
    }
}

/// A validated handler signature: its shape and the message it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Unary or context-aware.
    pub shape: HandlerShape,
    /// The message type, used as the registry key.
    pub message: MessageType,
}

/// The single return value of a handler.
///
/// Implemented for `Result<(), E>` where `E` converts into [`BoxError`]; the
/// error value is boxed, not wrapped, so callers can downcast it back.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid handler return type",
    label = "handlers must return `Result<(), E>`",
    note = "`E` can be any `std::error::Error + Send + Sync + 'static`, `String` or `BoxError`."
)]
pub trait HandlerOutput {
    /// Convert into the dispatcher's result type.
    fn into_result(self) -> Result<(), BoxError>;
}

impl<E> HandlerOutput for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// A type-erased handler for message `M`, tagged with its shape.
pub enum HandlerFn<M> {
    /// Called with the message only.
    Unary(Box<dyn Fn(M) -> Result<(), BoxError> + Send + Sync>),
    /// Called with the dispatch context, then the message.
    WithContext(Box<dyn Fn(&Context, M) -> Result<(), BoxError> + Send + Sync>),
}

impl<M> HandlerFn<M> {
    /// The shape this handler was registered with.
    pub fn shape(&self) -> HandlerShape {
        match self {
            HandlerFn::Unary(_) => HandlerShape::Unary,
            HandlerFn::WithContext(_) => HandlerShape::WithContext,
        }
    }
}

/// Conversion from a function or closure into a [`HandlerFn`].
///
/// `Args` is a marker that keeps the two shapes apart: `(M,)` for unary
/// handlers and `(Context, M)` for context-aware ones. It is always inferred.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid message handler",
    label = "expected `Fn(M) -> Result<(), E>` or `Fn(&Context, M) -> Result<(), E>`",
    note = "A handler takes one message record, optionally preceded by `&Context`, and returns a single `Result<(), E>`."
)]
pub trait IntoHandler<Args>: Send + Sync + Sized + 'static {
    /// The message this handler accepts.
    type Message: Message;

    /// The shape of this handler.
    const SHAPE: HandlerShape;

    /// Erase the concrete function type.
    fn into_handler_fn(self) -> HandlerFn<Self::Message>;
}

impl<F, M, R> IntoHandler<(M,)> for F
where
    F: Fn(M) -> R + Send + Sync + 'static,
    M: Message,
    R: HandlerOutput,
{
    type Message = M;

    const SHAPE: HandlerShape = HandlerShape::Unary;

    fn into_handler_fn(self) -> HandlerFn<M> {
        HandlerFn::Unary(Box::new(move |msg: M| (self)(msg).into_result()))
    }
}

impl<F, M, R> IntoHandler<(Context, M)> for F
where
    F: Fn(&Context, M) -> R + Send + Sync + 'static,
    M: Message,
    R: HandlerOutput,
{
    type Message = M;

    const SHAPE: HandlerShape = HandlerShape::WithContext;

    fn into_handler_fn(self) -> HandlerFn<M> {
        HandlerFn::WithContext(Box::new(move |ctx: &Context, msg: M| {
            (self)(ctx, msg).into_result()
        }))
    }
}

/// Validate the handler type `H` and extract the message type it handles.
///
/// Pure: looks only at types, never at the handler value.
pub fn validate<H, Args>() -> Result<Signature, RegistrationError>
where
    H: IntoHandler<Args>,
{
    let shape = H::SHAPE;
    let kind = <H::Message as Message>::KIND;
    let message = MessageType::of::<H::Message>();

    if !kind.is_record() {
        return Err(RegistrationError::NotARecord {
            message,
            kind,
            position: shape.message_position(),
        });
    }

    Ok(Signature { shape, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    struct CancelOrder {
        order_id: String,
    }
    impl Message for CancelOrder {}

    fn signature_of<H: IntoHandler<A>, A>(_: &H) -> Result<Signature, RegistrationError> {
        validate::<H, A>()
    }

    #[test]
    fn test_unary_record_is_accepted() {
        let handler = |_: CancelOrder| -> Result<(), BoxError> { Ok(()) };
        let sig = signature_of(&handler).unwrap();
        assert_eq!(sig.shape, HandlerShape::Unary);
        assert_eq!(sig.message, MessageType::of::<CancelOrder>());
    }

    #[test]
    fn test_context_record_is_accepted() {
        let handler = |_: &Context, _: CancelOrder| -> Result<(), std::fmt::Error> { Ok(()) };
        let sig = signature_of(&handler).unwrap();
        assert_eq!(sig.shape, HandlerShape::WithContext);
        assert_eq!(sig.shape.arity(), 2);
        assert_eq!(sig.message.name(), "CancelOrder");
    }

    #[test]
    fn test_primitive_parameter_is_rejected() {
        let handler = |_: String| -> Result<(), BoxError> { Ok(()) };
        let err = signature_of(&handler).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::NotARecord {
                message: MessageType::of::<String>(),
                kind: MessageKind::Primitive,
                position: ParamPosition::Sole,
            }
        );
    }

    #[test]
    fn test_collection_in_second_position_is_rejected() {
        let handler = |_: &Context, _: Vec<u8>| -> Result<(), BoxError> { Ok(()) };
        let err = signature_of(&handler).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::NotARecord {
                kind: MessageKind::Collection,
                position: ParamPosition::Second,
                ..
            }
        ));
    }

    #[test]
    fn test_pointer_parameter_is_rejected() {
        let handler = |_: Box<CancelOrder>| -> Result<(), BoxError> { Ok(()) };
        assert!(matches!(
            signature_of(&handler),
            Err(RegistrationError::NotARecord {
                kind: MessageKind::Pointer,
                ..
            })
        ));
    }

    #[test]
    fn test_handler_fn_keeps_shape_and_error() {
        let handler = |msg: CancelOrder| -> Result<(), String> { Err(msg.order_id) };
        let erased = handler.into_handler_fn();
        assert_eq!(erased.shape(), HandlerShape::Unary);

        let HandlerFn::Unary(call) = erased else {
            panic!("expected unary handler");
        };
        let err = call(CancelOrder {
            order_id: "order-123".into(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "order-123");
    }
}
