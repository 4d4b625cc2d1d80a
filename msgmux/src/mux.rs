//! The dispatch registry.
//!
//! [`DispatchMux`] maps each message type to exactly one handler and routes
//! dispatched values to it. Registration problems are programming errors and
//! panic; dispatch problems are returned as [`DispatchError`].

use crate::invoker;
use msgmux_core::{
    Context, DispatchError, HandlerFn, HandlerShape, IntoHandler, Message, MessageType,
    RegistrationError, Signature, validate,
};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A registered handler, stored with its message type erased.
pub struct HandlerEntry {
    signature: Signature,
    handler: Box<dyn Any + Send + Sync>,
}

impl HandlerEntry {
    fn new<M: Message>(signature: Signature, handler: HandlerFn<M>) -> Self {
        Self {
            signature,
            handler: Box::new(handler),
        }
    }

    /// The validated signature of the handler.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Unary or context-aware.
    pub fn shape(&self) -> HandlerShape {
        self.signature.shape
    }

    /// The handler typed for `M`, or `None` if it was registered for another
    /// message type.
    pub fn downcast<M: Message>(&self) -> Option<&HandlerFn<M>> {
        self.handler.downcast_ref::<HandlerFn<M>>()
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("message", &self.signature.message)
            .field("shape", &self.signature.shape)
            .finish_non_exhaustive()
    }
}

/// Routes each message to the single handler registered for its type.
///
/// The handler table does not exist until the first successful registration.
/// Until then every dispatch succeeds without doing anything; afterwards a
/// message without a handler is [`DispatchError::NoHandlerRegistered`].
///
/// `DispatchMux` is `Send + Sync`. Register everything up front and share it
/// behind an `Arc`, or wrap it in a `RwLock` if handlers can be added while
/// other threads dispatch.
///
/// # Example
///
/// ```rust
/// use msgmux::{BoxError, Context, DispatchMux, Message};
///
/// #[derive(Message)]
/// struct CancelOrder {
///     order_id: String,
///     reason: String,
/// }
///
/// #[derive(Message)]
/// struct OrderCompleted {
///     order_id: String,
/// }
///
/// let mut mux = DispatchMux::new();
/// mux.handle(|e: CancelOrder| -> Result<(), BoxError> {
///     println!("CancelOrder{{OrderID:{} Reason:{}}}", e.order_id, e.reason);
///     Ok(())
/// });
/// mux.handle(|ctx: &Context, e: OrderCompleted| -> Result<(), BoxError> {
///     ctx.check()?;
///     println!("OrderCompleted{{OrderID:{}}}", e.order_id);
///     Ok(())
/// });
///
/// mux.dispatch(CancelOrder {
///     order_id: "order-123".into(),
///     reason: "Change my mind".into(),
/// })
/// .unwrap();
/// mux.dispatch(OrderCompleted {
///     order_id: "order-123".into(),
/// })
/// .unwrap();
/// ```
#[derive(Default)]
pub struct DispatchMux {
    handlers: Option<HashMap<MessageType, HandlerEntry>>,
}

impl DispatchMux {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self { handlers: None }
    }

    /// Register `handler` for the message type it accepts.
    ///
    /// # Panics
    ///
    /// If the handler's message parameter is not a record, or a handler for
    /// that message type is already registered. The dispatcher is left
    /// unchanged.
    #[track_caller]
    pub fn handle<H, Args>(&mut self, handler: H)
    where
        H: IntoHandler<Args>,
    {
        if let Err(err) = self.try_handle(handler) {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %err, "rejected handler registration");
            panic!("msgmux: {err}");
        }
    }

    /// Register `handler`, returning the rule it violates instead of
    /// panicking.
    ///
    /// On success returns the message type the handler was registered for.
    pub fn try_handle<H, Args>(&mut self, handler: H) -> Result<MessageType, RegistrationError>
    where
        H: IntoHandler<Args>,
    {
        let signature = validate::<H, Args>()?;
        let message = signature.message;

        if self.lookup(message).is_some() {
            return Err(RegistrationError::DuplicateHandler(message));
        }

        let entry = HandlerEntry::new(signature, handler.into_handler_fn());
        self.handlers
            .get_or_insert_with(HashMap::new)
            .insert(message, entry);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message_type = %message,
            shape = ?signature.shape,
            "registered message handler"
        );

        Ok(message)
    }

    /// Dispatch `msg` with the background context.
    pub fn dispatch<M: Message>(&self, msg: M) -> Result<(), DispatchError> {
        self.dispatch_with_context(&Context::background(), msg)
    }

    /// Dispatch `msg`, handing `ctx` to the handler if it takes one.
    ///
    /// The context is passed through untouched; a cancelled or expired
    /// context does not stop the handler from being called.
    pub fn dispatch_with_context<M: Message>(
        &self,
        ctx: &Context,
        msg: M,
    ) -> Result<(), DispatchError> {
        let message = MessageType::of::<M>();

        let kind = M::KIND;
        if !kind.is_record() {
            #[cfg(feature = "tracing")]
            tracing::debug!(message_type = %message, kind = %kind, "rejected non-record message");
            return Err(DispatchError::InvalidMessageShape { message, kind });
        }

        let Some(handlers) = &self.handlers else {
            #[cfg(feature = "tracing")]
            tracing::trace!(message_type = %message, "no handlers registered yet, message dropped");
            return Ok(());
        };

        let Some(handler) = handlers.get(&message).and_then(HandlerEntry::downcast::<M>) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(message_type = %message, "no handler registered");
            return Err(DispatchError::NoHandlerRegistered(message));
        };

        invoker::invoke(handler, ctx, msg).map_err(DispatchError::Handler)
    }

    /// The entry registered for `message`, if any.
    pub fn lookup(&self, message: MessageType) -> Option<&HandlerEntry> {
        self.handlers.as_ref()?.get(&message)
    }

    /// Returns `true` if a handler is registered for `M`.
    pub fn contains<M: Message>(&self) -> bool {
        self.lookup(MessageType::of::<M>()).is_some()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.as_ref().map_or(0, HashMap::len)
    }

    /// Returns `true` if no handler has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The message types that have a handler, in no particular order.
    pub fn message_types(&self) -> impl Iterator<Item = MessageType> + '_ {
        self.handlers.iter().flat_map(|handlers| handlers.keys().copied())
    }
}

impl fmt::Debug for DispatchMux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchMux")
            .field("handlers", &self.handlers.as_ref().map(HashMap::values))
            .finish()
    }
}
