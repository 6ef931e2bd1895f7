//! Tri-state update field.

use serde::{Deserialize, Deserializer};

/// A field in a partial-update payload.
///
/// Distinguishes "field omitted" (leave the column untouched) from "field
/// explicitly set to null" (clear a nullable column). Plain `Option<T>`
/// cannot express the difference once `serde(default)` kicks in.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

// Manual impl: the derived one would demand `T: Default`.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}
