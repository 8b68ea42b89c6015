// SPDX-License-Identifier: MPL-2.0
//! Type-erased page identifiers.
//!
//! The viewer never depends on the host's concrete identifier type:
//! every page is keyed by a [`MediaId`], an opaque box over any value
//! that supports equality and hashing. Boxes built from different
//! concrete types never compare equal, even when the wrapped values
//! would.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Object-safe facade over `Eq + Hash` for erased identifier values.
trait ErasedId: Any + Send + Sync {
    fn eq_erased(&self, other: &dyn ErasedId) -> bool;
    fn hash_erased(&self, state: &mut dyn Hasher);
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T> ErasedId for T
where
    T: Any + Eq + Hash + Send + Sync,
{
    fn eq_erased(&self, other: &dyn ErasedId) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn hash_erased(&self, mut state: &mut dyn Hasher) {
        // TypeId participates so equal-looking values of different
        // concrete types land in different buckets, matching eq_erased.
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Uniform, hashable handle standing in for any host-defined identifier
/// type.
///
/// Cloning is cheap (shared ownership of the boxed value).
#[derive(Clone)]
pub struct MediaId(Arc<dyn ErasedId>);

impl MediaId {
    /// Erases a concrete identifier value.
    ///
    /// Passing a value that is already a `MediaId` is a caller bug; it is
    /// detected, reported through `log::warn!`, and flattened so equality
    /// still behaves correctly afterwards.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Eq + Hash + Send + Sync,
    {
        let any: &dyn Any = &value;
        if let Some(already) = any.downcast_ref::<MediaId>() {
            log::warn!("MediaId::new called with an already erased identifier; flattening");
            return already.clone();
        }
        Self(Arc::new(value))
    }

    /// Returns the wrapped value.
    ///
    /// # Panics
    ///
    /// Panics when `T` is not the originally erased type. A mismatch
    /// means the host queried its own data source with the wrong
    /// identifier type, which is a programming error rather than a
    /// runtime condition. Use [`try_value`](Self::try_value) for a
    /// checked downcast.
    #[must_use]
    pub fn value<T: Any>(&self) -> &T {
        self.try_value::<T>().unwrap_or_else(|| {
            panic!(
                "media identifier holds {} but was queried as {}",
                self.0.type_name(),
                std::any::type_name::<T>()
            )
        })
    }

    /// Returns the wrapped value, or `None` when `T` does not match the
    /// originally erased type.
    #[must_use]
    pub fn try_value<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Name of the erased concrete type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }
}

impl PartialEq for MediaId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_erased(other.0.as_ref())
    }
}

impl Eq for MediaId {}

impl Hash for MediaId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_erased(state);
    }
}

impl fmt::Debug for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaId").field(&self.0.type_name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn hash_of(id: &MediaId) -> u64 {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn round_trip_preserves_value() {
        let id = MediaId::new(42_u64);
        assert_eq!(*id.value::<u64>(), 42);

        let id = MediaId::new(PathBuf::from("/photos/a.jpg"));
        assert_eq!(id.value::<PathBuf>(), &PathBuf::from("/photos/a.jpg"));
    }

    #[test]
    fn equality_follows_wrapped_value() {
        assert_eq!(MediaId::new(7_u32), MediaId::new(7_u32));
        assert_ne!(MediaId::new(7_u32), MediaId::new(8_u32));
    }

    #[test]
    fn different_concrete_types_never_compare_equal() {
        // Same bit pattern, different types.
        assert_ne!(MediaId::new(7_u32), MediaId::new(7_u64));
        assert_ne!(MediaId::new(String::from("7")), MediaId::new(7_u32));
    }

    #[test]
    fn hashes_agree_with_equality() {
        assert_eq!(hash_of(&MediaId::new(7_u32)), hash_of(&MediaId::new(7_u32)));
        assert_ne!(hash_of(&MediaId::new(7_u32)), hash_of(&MediaId::new(7_u64)));
    }

    #[test]
    fn usable_as_hash_map_key() {
        let mut set = HashSet::new();
        set.insert(MediaId::new(1_u32));
        set.insert(MediaId::new(2_u32));
        set.insert(MediaId::new(1_u32));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&MediaId::new(2_u32)));
    }

    #[test]
    fn double_boxing_is_flattened() {
        let inner = MediaId::new(9_i64);
        let outer = MediaId::new(inner.clone());
        // Idempotent: the nested box is observably equal to the flat one.
        assert_eq!(outer, inner);
        assert_eq!(*outer.value::<i64>(), 9);
    }

    #[test]
    #[should_panic(expected = "was queried as")]
    fn typed_access_with_wrong_type_panics() {
        let id = MediaId::new(1_u32);
        let _ = id.value::<String>();
    }

    #[test]
    fn try_value_returns_none_on_mismatch() {
        let id = MediaId::new(1_u32);
        assert!(id.try_value::<String>().is_none());
        assert_eq!(id.try_value::<u32>(), Some(&1));
    }

    #[test]
    fn debug_names_the_erased_type() {
        let id = MediaId::new(5_u16);
        assert!(format!("{:?}", id).contains("u16"));
    }
}
