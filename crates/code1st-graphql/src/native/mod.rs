//! Native capability layer.
//!
//! Rust has no runtime reflection, so every domain type describes itself:
//! classes through [`GraphQLObject`], enumerations through [`GraphQLEnum`],
//! and every value type through [`Reflect`]. The schema generator only ever
//! walks these descriptions.
//!
//! ```
//! use code1st_graphql::native::{ClassDescriptor, GraphQLObject, Member};
//!
//! struct HelloController;
//!
//! impl GraphQLObject for HelloController {
//!     fn describe() -> ClassDescriptor<Self> {
//!         ClassDescriptor::new().member(
//!             Member::method1("hello", "greet", |_: &Self, greet: String| {
//!                 format!("Hello {greet}!")
//!             })
//!             .query(),
//!         )
//!     }
//! }
//! ```

mod class;
mod enumeration;
mod types;
mod value;

pub use class::{
    ClassDescriptor, ClassInfo, GraphQLObject, Invoker, Member, MemberInfo, Meta, OperationKind,
    Param, ParamInfo,
};
pub use enumeration::{EnumDescriptor, EnumInfo, EnumValueInfo, GraphQLEnum};
pub use types::{ClassRef, EnumRef, LIST_TYPE, NativeOrigin, NativeType, Reflect, STREAM_TYPE};
pub use value::{AnyObject, EventStream, NativeObject, NativeValue};

/// Implements [`Reflect`] for described classes.
///
/// ```ignore
/// reflect_object!(Person, Address);
/// ```
#[macro_export]
macro_rules! reflect_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::native::Reflect for $ty {
                fn native_type() -> $crate::native::NativeType {
                    $crate::native::NativeType::class::<Self>()
                }

                fn into_native(self) -> $crate::native::NativeValue {
                    $crate::native::NativeValue::object(self)
                }

                fn from_native(
                    value: $crate::native::NativeValue,
                ) -> ::std::result::Result<Self, $crate::error::ResolveError> {
                    value.into_object::<Self>()
                }
            }
        )+
    };
}

/// Implements [`Reflect`] for described enumerations.
#[macro_export]
macro_rules! reflect_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::native::Reflect for $ty {
                fn native_type() -> $crate::native::NativeType {
                    $crate::native::NativeType::enumeration::<Self>()
                }

                fn into_native(self) -> $crate::native::NativeValue {
                    $crate::native::NativeValue::from_enum(self)
                }

                fn from_native(
                    value: $crate::native::NativeValue,
                ) -> ::std::result::Result<Self, $crate::error::ResolveError> {
                    value.into_enum::<Self>()
                }
            }
        )+
    };
}
