//! Message trait and routing identity for message types.

use std::any::{TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The structural class of a message type.
///
/// Only [`MessageKind::Record`] types can be routed. The other kinds exist so
/// that primitives, collections and pointers can still be named as messages
/// and rejected with a descriptive error instead of a silent mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A struct with zero or more fields.
    Record,
    /// A scalar or string value.
    Primitive,
    /// A sequence, set or map.
    Collection,
    /// A box, shared pointer or reference.
    Pointer,
}

impl MessageKind {
    /// Returns `true` for [`MessageKind::Record`].
    pub const fn is_record(self) -> bool {
        matches!(self, MessageKind::Record)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageKind::Record => "record",
            MessageKind::Primitive => "primitive",
            MessageKind::Collection => "collection",
            MessageKind::Pointer => "pointer",
        })
    }
}

/// A marker trait for values that can be dispatched.
///
/// Messages must be `Send + Sync + 'static`. Structs normally get this
/// through `#[derive(Message)]`; a hand-written impl is a record unless it
/// overrides [`Message::KIND`].
///
/// # Example
///
/// ```rust
/// use msgmux_core::Message;
///
/// struct OrderCompleted {
///     order_id: String,
/// }
///
/// impl Message for OrderCompleted {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a message",
    label = "must implement `Message`",
    note = "Add `#[derive(Message)]` to the struct that carries this message."
)]
pub trait Message: Send + Sync + 'static {
    /// Structural class used by registration and dispatch checks.
    const KIND: MessageKind = MessageKind::Record;
}

macro_rules! impl_message_kind {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Message for $ty {
                const KIND: MessageKind = MessageKind::$kind;
            }
        )+
    };
}

impl_message_kind!(Primitive =>
    (), bool, char, String,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl<T: Message> Message for Vec<T> {
    const KIND: MessageKind = MessageKind::Collection;
}
impl<T: Message> Message for VecDeque<T> {
    const KIND: MessageKind = MessageKind::Collection;
}
impl<T: Message, const N: usize> Message for [T; N] {
    const KIND: MessageKind = MessageKind::Collection;
}
impl<K: Message, V: Message, S: Send + Sync + 'static> Message for HashMap<K, V, S> {
    const KIND: MessageKind = MessageKind::Collection;
}
impl<K: Message, V: Message> Message for BTreeMap<K, V> {
    const KIND: MessageKind = MessageKind::Collection;
}
impl<T: Message, S: Send + Sync + 'static> Message for HashSet<T, S> {
    const KIND: MessageKind = MessageKind::Collection;
}
impl<T: Message> Message for BTreeSet<T> {
    const KIND: MessageKind = MessageKind::Collection;
}

impl<T: Message> Message for Box<T> {
    const KIND: MessageKind = MessageKind::Pointer;
}
impl<T: Message> Message for Arc<T> {
    const KIND: MessageKind = MessageKind::Pointer;
}
impl<T: Message> Message for &'static T {
    const KIND: MessageKind = MessageKind::Pointer;
}

/// The routing identity of a message type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics. `Display` prints the name without its module path.
#[derive(Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    type_name: &'static str,
}

impl MessageType {
    /// The identity of `M`.
    pub fn of<M: Message>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type name without its module path, e.g. `ShipOrder`.
    pub fn name(&self) -> &'static str {
        short_name(self.type_name)
    }
}

fn short_name(full: &'static str) -> &'static str {
    // Arrays, references, tuples and slices are printed as is.
    if !full.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return full;
    }
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageType").field(&self.type_name).finish()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ShipOrder;
    impl Message for ShipOrder {}

    struct Envelope<T>(T);
    impl<T: Send + Sync + 'static> Message for Envelope<T> {}

    #[test]
    fn test_default_kind_is_record() {
        assert_eq!(ShipOrder::KIND, MessageKind::Record);
        assert!(ShipOrder::KIND.is_record());
    }

    #[test]
    fn test_builtin_kinds() {
        assert_eq!(<i32 as Message>::KIND, MessageKind::Primitive);
        assert_eq!(<String as Message>::KIND, MessageKind::Primitive);
        assert_eq!(<Vec<ShipOrder> as Message>::KIND, MessageKind::Collection);
        assert_eq!(<HashMap<String, u8> as Message>::KIND, MessageKind::Collection);
        assert_eq!(<Box<ShipOrder> as Message>::KIND, MessageKind::Pointer);
        assert_eq!(<&'static ShipOrder as Message>::KIND, MessageKind::Pointer);
    }

    #[test]
    fn test_short_name_strips_module_path() {
        assert_eq!(MessageType::of::<ShipOrder>().name(), "ShipOrder");
        assert!(MessageType::of::<ShipOrder>().type_name().ends_with("::ShipOrder"));
        assert_eq!(MessageType::of::<ShipOrder>().to_string(), "ShipOrder");
    }

    #[test]
    fn test_short_name_keeps_generic_arguments() {
        let name = MessageType::of::<Envelope<u8>>().name();
        assert_eq!(name, "Envelope<u8>");
        assert_eq!(short_name("plain"), "plain");
    }

    #[test]
    fn test_non_path_names_are_kept_whole() {
        let array = MessageType::of::<[ShipOrder; 3]>();
        assert_eq!(array.name(), array.type_name());
        assert!(array.name().starts_with('['));
        assert!(array.name().ends_with("::ShipOrder; 3]"));

        let reference = MessageType::of::<&'static ShipOrder>();
        assert!(reference.name().starts_with('&'));
        assert!(reference.name().ends_with("::ShipOrder"));

        assert_eq!(MessageType::of::<()>().name(), "()");
    }

    #[test]
    fn test_identity_is_type_id() {
        assert_eq!(MessageType::of::<ShipOrder>(), MessageType::of::<ShipOrder>());
        assert_ne!(
            MessageType::of::<Envelope<u8>>(),
            MessageType::of::<Envelope<u16>>()
        );
    }
}
