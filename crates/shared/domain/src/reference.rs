//! Typed foreign-key references used in write payloads.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::serde_helpers;

/// Reference to an existing `T` by its key.
///
/// Kept apart from scalar attributes so a payload cannot confuse
/// "link to product 7" with "quantity 7".
pub struct Reference<T> {
    id: i64,
    _target: PhantomData<fn() -> T>,
}

impl<T> Reference<T> {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            _target: PhantomData,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl<T> Clone for Reference<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Reference<T> {}

impl<T> PartialEq for Reference<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Reference<T> {}

impl<T> std::hash::Hash for Reference<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("?");
        write!(f, "Reference<{}>({})", target, self.id)
    }
}

impl<T> From<i64> for Reference<T> {
    fn from(id: i64) -> Self {
        Reference::new(id)
    }
}

impl<T> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        serde_helpers::id::serialize(&self.id, s)
    }
}

impl<'de, T> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        serde_helpers::id::deserialize(d).map(Reference::new)
    }
}
