//! Calls a looked-up handler with the arguments its shape expects.

use msgmux_core::{BoxError, Context, HandlerFn, Message};

/// Invoke `handler` with `msg`, passing `ctx` only to context-aware handlers.
///
/// The handler's error is returned as is.
pub(crate) fn invoke<M: Message>(
    handler: &HandlerFn<M>,
    ctx: &Context,
    msg: M,
) -> Result<(), BoxError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "dispatch",
        message_type = %msgmux_core::MessageType::of::<M>(),
        shape = ?handler.shape(),
    )
    .entered();

    let result = match handler {
        HandlerFn::Unary(call) => call(msg),
        HandlerFn::WithContext(call) => call(ctx, msg),
    };

    #[cfg(feature = "tracing")]
    let result =
        result.inspect_err(|err| tracing::debug!(error = %err, "handler reported failure"));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgmux_core::IntoHandler;
    use std::sync::{Arc, Mutex};

    struct OrderCompleted {
        order_id: String,
    }
    impl Message for OrderCompleted {}

    #[test]
    fn test_unary_receives_message() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler = (move |e: OrderCompleted| -> Result<(), BoxError> {
            sink.lock().unwrap().push(e.order_id);
            Ok(())
        })
        .into_handler_fn();

        let msg = OrderCompleted {
            order_id: "order-123".into(),
        };
        invoke(&handler, &Context::background(), msg).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["order-123".to_string()]);
    }

    #[test]
    fn test_context_handler_receives_same_context() {
        let (ctx, _cancel) = Context::background().with_cancel();
        let expected = ctx.clone();
        let handler = (move |got: &Context, _: OrderCompleted| -> Result<(), BoxError> {
            assert!(got.same_as(&expected));
            Ok(())
        })
        .into_handler_fn();

        let msg = OrderCompleted {
            order_id: "order-123".into(),
        };
        invoke(&handler, &ctx, msg).unwrap();
    }

    #[test]
    fn test_error_is_returned_unchanged() {
        let handler =
            (|_: OrderCompleted| -> Result<(), String> { Err("ledger closed".into()) })
                .into_handler_fn();

        let msg = OrderCompleted {
            order_id: "order-123".into(),
        };
        let err = invoke(&handler, &Context::background(), msg).unwrap_err();
        assert_eq!(err.to_string(), "ledger closed");
    }
}
