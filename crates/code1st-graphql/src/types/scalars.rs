//! Scalar mapping and coercion.
//!
//! The set of scalars is closed: the four GraphQL built-ins the generator
//! uses (`Int`, `Float`, `String`, `Boolean`) plus two custom scalars:
//!
//! - `Long` - a 64-bit integer
//! - `Instant` - a point in time, ISO-8601 / RFC 3339 string on the wire,
//!   always serialized in UTC
//!
//! Native type names that are not in the table are "not a scalar", which
//! lets the type resolver fall through to the object generator.

use async_graphql::{Number, Value};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::ResolveError;
use crate::native::{NativeType, NativeValue};

/// One of the schema scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Long,
    Float,
    String,
    Boolean,
    Instant,
}

impl ScalarKind {
    /// Custom scalars that must be registered with the engine.
    pub const CUSTOM: [ScalarKind; 2] = [ScalarKind::Long, ScalarKind::Instant];

    /// Maps a native type name to its scalar.
    #[must_use]
    pub fn for_type_name(name: &str) -> Option<Self> {
        match name {
            "i32" => Some(Self::Int),
            "i64" => Some(Self::Long),
            "String" => Some(Self::String),
            "bool" => Some(Self::Boolean),
            "f64" | "f32" => Some(Self::Float),
            "OffsetDateTime" | "SystemTime" => Some(Self::Instant),
            _ => None,
        }
    }

    /// Maps a native type to its scalar. Only leaf types can be scalars.
    #[must_use]
    pub fn for_native(native: &NativeType) -> Option<Self> {
        match native {
            NativeType::Named(name) => Self::for_type_name(name),
            _ => None,
        }
    }

    /// Schema name of the scalar.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Instant => "Instant",
        }
    }

    /// Description registered for a custom scalar. The engine describes
    /// the built-in scalars itself.
    #[must_use]
    pub fn description(self) -> Option<&'static str> {
        match self {
            Self::Long => Some("64-bit signed integer"),
            Self::Instant => Some("An instant in time as an ISO-8601 string, e.g. 2024-01-15T10:30:00Z"),
            Self::Int | Self::Float | Self::String | Self::Boolean => None,
        }
    }

    /// True for scalars the execution engine provides itself.
    #[must_use]
    pub fn is_builtin(self) -> bool {
        !matches!(self, Self::Long | Self::Instant)
    }

    /// Coerces a raw request value into a native value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Coercion`] when the value has the wrong shape
    /// or, for `Instant`, is not a valid timestamp.
    pub fn parse_value(self, value: &Value) -> Result<NativeValue, ResolveError> {
        if matches!(value, Value::Null) {
            return Ok(NativeValue::Null);
        }
        match (self, value) {
            (Self::Int, Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(NativeValue::Int)
                .ok_or_else(|| out_of_range(self, n)),
            (Self::Long, Value::Number(n)) => n
                .as_i64()
                .map(NativeValue::Long)
                .ok_or_else(|| out_of_range(self, n)),
            (Self::Long, Value::String(s)) => s.parse::<i64>().map(NativeValue::Long).map_err(|_| {
                ResolveError::coercion(format!("Invalid Long value '{s}'"))
            }),
            (Self::Float, Value::Number(n)) => n
                .as_f64()
                .map(NativeValue::Float)
                .ok_or_else(|| out_of_range(self, n)),
            (Self::String, Value::String(s)) => Ok(NativeValue::String(s.clone())),
            (Self::Boolean, Value::Boolean(b)) => Ok(NativeValue::Boolean(*b)),
            (Self::Instant, Value::String(s)) => parse_instant(s).map(NativeValue::Instant),
            _ => Err(mismatch(self, value_kind(value))),
        }
    }

    /// Checks a literal written in the query document.
    ///
    /// Literals of the custom scalars must be strings or, for `Long`,
    /// integers; any other literal shape is a coercion error.
    ///
    /// # Errors
    ///
    /// Same as [`ScalarKind::parse_value`].
    pub fn parse_literal(self, value: &Value) -> Result<NativeValue, ResolveError> {
        match (self, value) {
            (Self::Instant, Value::String(_))
            | (Self::Long, Value::Number(_) | Value::String(_))
            | (Self::Int | Self::Float, Value::Number(_))
            | (Self::String, Value::String(_))
            | (Self::Boolean, Value::Boolean(_)) => self.parse_value(value),
            _ => Err(mismatch(self, value_kind(value))),
        }
    }

    /// Converts a native result into its wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Coercion`] when the native value does not
    /// belong to this scalar.
    pub fn serialize(self, value: &NativeValue) -> Result<Value, ResolveError> {
        match (self, value) {
            (_, NativeValue::Null) => Ok(Value::Null),
            (Self::Int, NativeValue::Int(v)) => Ok(Value::from(*v)),
            (Self::Int, NativeValue::Long(v)) => i32::try_from(*v)
                .map(Value::from)
                .map_err(|_| ResolveError::coercion(format!("Value {v} does not fit in 'Int'"))),
            (Self::Long, NativeValue::Long(v)) => Ok(Value::from(*v)),
            (Self::Long, NativeValue::Int(v)) => Ok(Value::from(i64::from(*v))),
            (Self::Float, NativeValue::Float(v)) => float_value(*v),
            (Self::Float, NativeValue::Int(v)) => float_value(f64::from(*v)),
            (Self::String, NativeValue::String(s)) => Ok(Value::String(s.clone())),
            (Self::Boolean, NativeValue::Boolean(b)) => Ok(Value::Boolean(*b)),
            (Self::Instant, NativeValue::Instant(t)) => format_instant(*t).map(Value::String),
            (Self::Instant, NativeValue::String(s)) => {
                format_instant(parse_instant(s)?).map(Value::String)
            }
            (_, other) => Err(mismatch(self, other.kind())),
        }
    }
}

fn mismatch(scalar: ScalarKind, found: &str) -> ResolveError {
    ResolveError::coercion(format!(
        "Expected type '{}' but was '{found}'.",
        scalar.name()
    ))
}

fn out_of_range(scalar: ScalarKind, n: &Number) -> ResolveError {
    ResolveError::coercion(format!("Value {n} is out of range for '{}'", scalar.name()))
}

fn float_value(v: f64) -> Result<Value, ResolveError> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| ResolveError::coercion(format!("Value {v} is not a finite 'Float'")))
}

fn parse_instant(s: &str) -> Result<OffsetDateTime, ResolveError> {
    OffsetDateTime::parse(s, &Rfc3339)
        .map(|t| t.to_offset(UtcOffset::UTC))
        .map_err(|e| ResolveError::coercion(format!("Invalid Instant value '{s}': {e}")))
}

fn format_instant(t: OffsetDateTime) -> Result<String, ResolveError> {
    t.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| ResolveError::coercion(format!("Cannot format Instant: {e}")))
}

/// Short name of a raw value's shape, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Boolean(_) => "Boolean",
        Value::Binary(_) => "Binary",
        Value::Enum(_) => "Enum",
        Value::List(_) => "List",
        Value::Object(_) => "Object",
    }
}
