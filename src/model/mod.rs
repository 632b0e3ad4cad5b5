//! Document model (Intermediate Representation).
//!
//! This module defines the tree that serves as the pivot format between
//! Markdown and JSON. Instances are built fresh by every conversion and
//! are never mutated once the builder hands them out.

mod document;
mod node;

pub use document::*;
pub use node::*;

use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` as the field's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
