//! Native type metadata.
//!
//! [`NativeType`] is what the type generator walks instead of runtime
//! reflection. Every Rust type that can appear in a described member
//! implements [`Reflect`], which supplies its `NativeType` and converts
//! between the typed value and the dynamic [`NativeValue`].

use std::any::TypeId;
use std::fmt;
use std::time::SystemTime;

use time::OffsetDateTime;

use super::class::{ClassInfo, GraphQLObject};
use super::enumeration::{EnumInfo, GraphQLEnum};
use super::value::{EventStream, NativeValue};
use crate::error::ResolveError;

/// Raw name of the list wrapper recognised by the type resolver.
pub const LIST_TYPE: &str = "Vec";

/// Raw name of the single-value stream wrapper used by subscriptions.
pub const STREAM_TYPE: &str = "EventStream";

/// Description of a native type.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeType {
    /// A leaf type known only by name. Scalars are recognised by it.
    Named(&'static str),
    /// A parametrized type such as `Vec<T>` or `EventStream<T>`.
    Generic {
        /// Name of the raw (unparametrized) type.
        raw: &'static str,
        /// Actual type arguments, in declaration order.
        args: Vec<NativeType>,
    },
    /// A described enumeration.
    Enum(EnumRef),
    /// A described class.
    Class(ClassRef),
}

impl NativeType {
    /// Creates a leaf type.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self::Named(name)
    }

    /// Creates a parametrized type.
    #[must_use]
    pub fn generic(raw: &'static str, args: Vec<NativeType>) -> Self {
        Self::Generic { raw, args }
    }

    /// Creates the type of a described class.
    #[must_use]
    pub fn class<T: GraphQLObject>() -> Self {
        Self::Class(ClassRef::of::<T>())
    }

    /// Creates the type of a described enumeration.
    #[must_use]
    pub fn enumeration<E: GraphQLEnum>() -> Self {
        Self::Enum(EnumRef::of::<E>())
    }

    /// Returns the display name of this type, e.g. `Vec<i32>`.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Generic { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Enum(e) => f.write_str(e.type_name),
            Self::Class(c) => f.write_str(c.type_name),
        }
    }
}

/// Identity of a native type that can own a schema type name.
#[derive(Debug, Clone, Copy)]
pub struct NativeOrigin {
    /// Runtime identity.
    pub type_id: TypeId,
    /// Full Rust type name.
    pub type_name: &'static str,
}

impl NativeOrigin {
    /// Returns the origin of `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl PartialEq for NativeOrigin {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for NativeOrigin {}

/// Lazy reference to a described class.
///
/// The class description is only produced when the type generator expands
/// the class, so self-referential classes never recurse here.
#[derive(Clone, Copy)]
pub struct ClassRef {
    origin: NativeOrigin,
    type_name: &'static str,
    describe: fn() -> ClassInfo,
}

impl ClassRef {
    /// Returns the reference for class `T`.
    #[must_use]
    pub fn of<T: GraphQLObject>() -> Self {
        Self {
            origin: NativeOrigin::of::<T>(),
            type_name: std::any::type_name::<T>(),
            describe: describe_class::<T>,
        }
    }

    /// Native identity of the class.
    #[must_use]
    pub fn origin(&self) -> NativeOrigin {
        self.origin
    }

    /// Full Rust type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Produces the erased class description.
    #[must_use]
    pub fn describe(&self) -> ClassInfo {
        (self.describe)()
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassRef").field(&self.type_name).finish()
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
    }
}

fn describe_class<T: GraphQLObject>() -> ClassInfo {
    T::describe().into_info()
}

/// Lazy reference to a described enumeration.
#[derive(Clone, Copy)]
pub struct EnumRef {
    origin: NativeOrigin,
    type_name: &'static str,
    describe: fn() -> EnumInfo,
}

impl EnumRef {
    /// Returns the reference for enumeration `E`.
    #[must_use]
    pub fn of<E: GraphQLEnum>() -> Self {
        Self {
            origin: NativeOrigin::of::<E>(),
            type_name: std::any::type_name::<E>(),
            describe: describe_enum::<E>,
        }
    }

    /// Native identity of the enumeration.
    #[must_use]
    pub fn origin(&self) -> NativeOrigin {
        self.origin
    }

    /// Full Rust type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Produces the erased enumeration description.
    #[must_use]
    pub fn describe(&self) -> EnumInfo {
        (self.describe)()
    }
}

impl fmt::Debug for EnumRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumRef").field(&self.type_name).finish()
    }
}

impl PartialEq for EnumRef {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
    }
}

fn describe_enum<E: GraphQLEnum>() -> EnumInfo {
    E::describe().into_info()
}

/// Returns the last path segment of a Rust type name, without generics.
pub(crate) fn simple_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// A native type that can flow through described members.
///
/// Implemented here for the scalar-like primitives, `Vec<T>`, `Option<T>`
/// and [`EventStream<T>`]. Described classes and enumerations get their
/// implementation from [`reflect_object!`](crate::reflect_object) and
/// [`reflect_enum!`](crate::reflect_enum).
pub trait Reflect: Sized + Send + 'static {
    /// Type metadata for the type generator.
    fn native_type() -> NativeType;

    /// Converts a value into its dynamic representation.
    fn into_native(self) -> NativeValue;

    /// Converts a dynamic value back into the typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Coercion`] when the value has the wrong shape.
    fn from_native(value: NativeValue) -> Result<Self, ResolveError>;
}

fn mismatch(expected: &str, found: &NativeValue) -> ResolveError {
    ResolveError::coercion(format!(
        "Expected type '{expected}' but was '{}'.",
        found.kind()
    ))
}

impl Reflect for i32 {
    fn native_type() -> NativeType {
        NativeType::named("i32")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Int(self)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Int(v) => Ok(v),
            NativeValue::Long(v) => i32::try_from(v)
                .map_err(|_| ResolveError::coercion(format!("Value {v} does not fit in 'i32'"))),
            other => Err(mismatch("i32", &other)),
        }
    }
}

impl Reflect for i64 {
    fn native_type() -> NativeType {
        NativeType::named("i64")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Long(self)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Long(v) => Ok(v),
            NativeValue::Int(v) => Ok(i64::from(v)),
            other => Err(mismatch("i64", &other)),
        }
    }
}

impl Reflect for f64 {
    fn native_type() -> NativeType {
        NativeType::named("f64")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Float(self)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Float(v) => Ok(v),
            NativeValue::Int(v) => Ok(f64::from(v)),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl Reflect for f32 {
    fn native_type() -> NativeType {
        NativeType::named("f32")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Float(f64::from(self))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Float(v) => Ok(v as f32),
            NativeValue::Int(v) => Ok(v as f32),
            other => Err(mismatch("f32", &other)),
        }
    }
}

impl Reflect for bool {
    fn native_type() -> NativeType {
        NativeType::named("bool")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Boolean(self)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Boolean(v) => Ok(v),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl Reflect for String {
    fn native_type() -> NativeType {
        NativeType::named("String")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::String(self)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::String(v) => Ok(v),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl Reflect for OffsetDateTime {
    fn native_type() -> NativeType {
        NativeType::named("OffsetDateTime")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Instant(self)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Instant(v) => Ok(v),
            other => Err(mismatch("OffsetDateTime", &other)),
        }
    }
}

impl Reflect for SystemTime {
    fn native_type() -> NativeType {
        NativeType::named("SystemTime")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Instant(OffsetDateTime::from(self))
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Instant(v) => Ok(SystemTime::from(v)),
            other => Err(mismatch("SystemTime", &other)),
        }
    }
}

impl Reflect for () {
    fn native_type() -> NativeType {
        NativeType::named("()")
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Null
    }

    fn from_native(_value: NativeValue) -> Result<Self, ResolveError> {
        Ok(())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn native_type() -> NativeType {
        T::native_type()
    }

    fn into_native(self) -> NativeValue {
        self.map_or(NativeValue::Null, Reflect::into_native)
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::Null => Ok(None),
            other => T::from_native(other).map(Some),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn native_type() -> NativeType {
        NativeType::generic(LIST_TYPE, vec![T::native_type()])
    }

    fn into_native(self) -> NativeValue {
        NativeValue::List(self.into_iter().map(Reflect::into_native).collect())
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        match value {
            NativeValue::List(items) => items.into_iter().map(T::from_native).collect(),
            other => Err(mismatch("Vec", &other)),
        }
    }
}

impl<T: Reflect> Reflect for EventStream<T> {
    fn native_type() -> NativeType {
        NativeType::generic(STREAM_TYPE, vec![T::native_type()])
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Stream(self.into_native_stream())
    }

    fn from_native(value: NativeValue) -> Result<Self, ResolveError> {
        Err(ResolveError::coercion(format!(
            "Expected type '{STREAM_TYPE}' but was '{}'. Streams are output-only.",
            value.kind()
        )))
    }
}
