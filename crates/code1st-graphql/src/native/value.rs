//! Dynamic native values.
//!
//! A [`NativeValue`] is what flows between the coercion pipeline, bound
//! members and the engine: the typed arguments and results of described
//! members are converted to and from it through [`Reflect`](super::Reflect).

use std::any::Any;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use time::OffsetDateTime;
use tracing::warn;

use super::enumeration::GraphQLEnum;
use super::types::Reflect;
use crate::error::ResolveError;

/// A type-erased domain instance.
pub type AnyObject = dyn Any + Send + Sync;

/// An owned instance of a described class.
pub struct NativeObject {
    type_name: &'static str,
    inner: Box<AnyObject>,
}

impl NativeObject {
    /// Wraps a domain instance.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Box::new(value),
        }
    }

    pub(crate) fn from_boxed(type_name: &'static str, inner: Box<AnyObject>) -> Self {
        Self { type_name, inner }
    }

    /// Full Rust type name of the wrapped instance.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the wrapped instance as a receiver.
    #[must_use]
    pub fn as_any(&self) -> &AnyObject {
        self.inner.as_ref()
    }

    /// Mutably borrows the wrapped instance as a receiver.
    pub fn as_any_mut(&mut self) -> &mut AnyObject {
        self.inner.as_mut()
    }

    /// Borrows the wrapped instance as `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Unwraps the instance as `T`, handing the object back on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the instance is not a `T`.
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Self { type_name, inner })
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeObject").field(&self.type_name).finish()
    }
}

/// A dynamically typed native value.
pub enum NativeValue {
    /// Absent value.
    Null,
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// String.
    String(String),
    /// Point in time.
    Instant(OffsetDateTime),
    /// Enum constant, identified by its schema label.
    Enum(String),
    /// Enum constant with no label in its description, named by its Rust
    /// enum type.
    Unlabeled(&'static str),
    /// Ordered sequence.
    List(Vec<NativeValue>),
    /// Instance of a described class.
    Object(NativeObject),
    /// Stream of values produced by a subscription member.
    Stream(BoxStream<'static, NativeValue>),
}

impl NativeValue {
    /// Wraps a domain instance.
    pub fn object<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Object(NativeObject::new(value))
    }

    /// Unwraps a domain instance of type `T`.
    ///
    /// # Errors
    ///
    /// Returns a coercion error when the value is not an instance of `T`.
    pub fn into_object<T: 'static>(self) -> Result<T, ResolveError> {
        let expected = std::any::type_name::<T>();
        match self {
            Self::Object(obj) => obj.downcast::<T>().map_err(|obj| {
                ResolveError::coercion(format!(
                    "Expected type '{expected}' but was '{}'.",
                    obj.type_name()
                ))
            }),
            other => Err(ResolveError::coercion(format!(
                "Expected type '{expected}' but was '{}'.",
                other.kind()
            ))),
        }
    }

    /// Converts an enum constant into its label.
    ///
    /// A constant missing from its enum's description becomes
    /// [`NativeValue::Unlabeled`], which fails when serialized.
    pub fn from_enum<E: GraphQLEnum>(value: E) -> Self {
        match E::describe().label_of(value) {
            Some(label) => Self::Enum(label),
            None => {
                let enum_type = std::any::type_name::<E>();
                warn!(enum_type, "Enum constant missing from its description");
                Self::Unlabeled(enum_type)
            }
        }
    }

    /// Resolves an enum label back into its constant.
    ///
    /// # Errors
    ///
    /// Returns a coercion error for unknown labels and non-enum values.
    pub fn into_enum<E: GraphQLEnum>(self) -> Result<E, ResolveError> {
        let label = match self {
            Self::Enum(label) | Self::String(label) => label,
            other => {
                return Err(ResolveError::coercion(format!(
                    "Expected type '{}' but was '{}'.",
                    std::any::type_name::<E>(),
                    other.kind()
                )));
            }
        };
        E::describe().constant_for(&label).ok_or_else(|| {
            ResolveError::coercion(format!(
                "Unknown value '{label}' for enum '{}'",
                std::any::type_name::<E>()
            ))
        })
    }

    /// Short name of the value's shape, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Int(_) => "Int",
            Self::Long(_) => "Long",
            Self::Float(_) => "Float",
            Self::Boolean(_) => "Boolean",
            Self::String(_) => "String",
            Self::Instant(_) => "Instant",
            Self::Enum(_) | Self::Unlabeled(_) => "Enum",
            Self::List(_) => "List",
            Self::Object(_) => "Object",
            Self::Stream(_) => "Stream",
        }
    }

    /// Returns true for [`NativeValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Long(v) => f.debug_tuple("Long").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Instant(v) => f.debug_tuple("Instant").field(v).finish(),
            Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Self::Unlabeled(v) => f.debug_tuple("Unlabeled").field(v).finish(),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Object(v) => v.fmt(f),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Single-value stream returned by subscription members.
///
/// The wrapper has no schema representation of its own: the subscription
/// field is typed by the element type `T`.
pub struct EventStream<T> {
    inner: BoxStream<'static, T>,
}

impl<T: Send + 'static> EventStream<T> {
    /// Wraps any sendable stream.
    pub fn new(stream: impl Stream<Item = T> + Send + 'static) -> Self {
        Self {
            inner: stream.boxed(),
        }
    }
}

impl<T: Reflect> EventStream<T> {
    pub(crate) fn into_native_stream(self) -> BoxStream<'static, NativeValue> {
        self.inner.map(Reflect::into_native).boxed()
    }
}

impl<T: Send + 'static> FromIterator<T> for EventStream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        Self::new(stream::iter(items))
    }
}

impl<T> Stream for EventStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.inner.poll_next_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_object_downcast() {
        let value = NativeValue::object(Point { x: 3 });
        assert_eq!(value.into_object::<Point>().unwrap(), Point { x: 3 });
    }

    #[test]
    fn test_object_downcast_mismatch() {
        let err = NativeValue::object(Point { x: 3 })
            .into_object::<String>()
            .unwrap_err();
        assert!(err.to_string().contains("Point"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NativeValue::Null.kind(), "Null");
        assert_eq!(NativeValue::List(vec![]).kind(), "List");
        assert!(NativeValue::Null.is_null());
    }

    #[tokio::test]
    async fn test_event_stream_yields_items() {
        let stream: EventStream<i32> = vec![1, 2].into_iter().collect();
        let items: Vec<NativeValue> = stream.into_native_stream().collect().await;
        assert!(matches!(items.as_slice(), [NativeValue::Int(1), NativeValue::Int(2)]));
    }
}
