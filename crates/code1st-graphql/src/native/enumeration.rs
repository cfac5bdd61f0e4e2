//! Enumeration descriptions.

use std::fmt;

use super::class::Meta;
use super::types::{NativeOrigin, simple_name};

/// A domain enumeration that can appear in the schema.
pub trait GraphQLEnum: Copy + PartialEq + Send + Sync + 'static {
    /// Lists the constants in declaration order.
    fn describe() -> EnumDescriptor<Self>;
}

/// One enum constant: its native name and its optional label override.
#[derive(Debug, Clone)]
struct Constant<E> {
    value: E,
    name: String,
    label: String,
}

impl<E> Constant<E> {
    fn label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Typed description of enumeration `E`.
pub struct EnumDescriptor<E> {
    meta: Meta,
    constants: Vec<Constant<E>>,
}

impl<E: GraphQLEnum> Default for EnumDescriptor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: GraphQLEnum> EnumDescriptor<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::default(),
            constants: Vec::new(),
        }
    }

    /// Overrides the schema type name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.meta = self.meta.name(name);
        self
    }

    /// Overrides the schema type description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }

    /// Adds a constant labelled by its own name.
    #[must_use]
    pub fn constant(self, value: E, name: impl Into<String>) -> Self {
        self.labeled(value, name, "")
    }

    /// Adds a constant with a label override. An empty label keeps the name.
    #[must_use]
    pub fn labeled(mut self, value: E, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.constants.push(Constant {
            value,
            name: name.into(),
            label: label.into(),
        });
        self
    }

    /// Schema label of a constant.
    #[must_use]
    pub fn label_of(&self, value: E) -> Option<String> {
        self.constants
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label().to_owned())
    }

    /// Constant carrying the given schema label.
    #[must_use]
    pub fn constant_for(&self, label: &str) -> Option<E> {
        self.constants
            .iter()
            .find(|c| c.label() == label)
            .map(|c| c.value)
    }

    /// Erases the description.
    #[must_use]
    pub fn into_info(self) -> EnumInfo {
        let type_name = std::any::type_name::<E>();
        EnumInfo {
            origin: NativeOrigin::of::<E>(),
            type_name,
            simple_name: simple_name(type_name).to_owned(),
            meta: self.meta,
            values: self
                .constants
                .iter()
                .map(|c| EnumValueInfo {
                    name: c.name.clone(),
                    label: c.label().to_owned(),
                })
                .collect(),
        }
    }
}

/// Erased enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueInfo {
    /// Native constant name.
    pub name: String,
    /// Schema label.
    pub label: String,
}

/// Erased enumeration description.
#[derive(Clone)]
pub struct EnumInfo {
    origin: NativeOrigin,
    type_name: &'static str,
    simple_name: String,
    meta: Meta,
    values: Vec<EnumValueInfo>,
}

impl EnumInfo {
    #[must_use]
    pub fn origin(&self) -> NativeOrigin {
        self.origin
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Constants in declaration order.
    #[must_use]
    pub fn values(&self) -> &[EnumValueInfo] {
        &self.values
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo")
            .field("type_name", &self.type_name)
            .field("meta", &self.meta)
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeValue;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    impl GraphQLEnum for Color {
        fn describe() -> EnumDescriptor<Self> {
            EnumDescriptor::new()
                .constant(Color::Red, "RED")
                .labeled(Color::Green, "GREEN", "VERDE")
        }
    }

    #[test]
    fn test_labels_default_to_constant_name() {
        let info = Color::describe().into_info();
        assert_eq!(info.simple_name(), "Color");
        let labels: Vec<_> = info.values().iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["RED", "VERDE"]);
        assert_eq!(info.values()[1].name, "GREEN");
    }

    #[test]
    fn test_enum_value_conversion() {
        let native = NativeValue::from_enum(Color::Green);
        assert!(matches!(&native, NativeValue::Enum(label) if label == "VERDE"));
        assert_eq!(native.into_enum::<Color>().unwrap(), Color::Green);

        let err = NativeValue::Enum("GREEN".into()).into_enum::<Color>().unwrap_err();
        assert!(err.to_string().contains("Unknown value 'GREEN'"));
    }

    #[test]
    fn test_undescribed_constant_is_unlabeled() {
        let native = NativeValue::from_enum(Color::Blue);
        assert!(matches!(&native, NativeValue::Unlabeled(name) if name.ends_with("Color")));
        assert!(native.into_enum::<Color>().is_err());
    }
}
