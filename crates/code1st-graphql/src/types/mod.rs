//! Schema scalar types.
//!
//! The scalar mapper recognises a closed set of native leaf types and owns
//! the coercion rules between native values and wire values for each of them.

mod scalars;

pub(crate) use scalars::value_kind;
pub use scalars::ScalarKind;
