//! Identifiers tagged with the record type they name, so a cart id cannot be passed
//! where an item id is expected.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use uuid::Uuid;

// `fn() -> T` keeps the id `Send + Sync` and covariant without owning a `T`.
pub struct TypedUuid<T>(Uuid, PhantomData<fn() -> T>);

impl<T> TypedUuid<T> {
    /// A fresh UUIDv7, so ids sort by creation time.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, PhantomData)
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }

    fn record_name() -> &'static str {
        let full = std::any::type_name::<T>();

        full.rsplit("::").next().unwrap_or(full)
    }
}

impl<T> Default for TypedUuid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedUuid<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedUuid<T> {}

/// `CartRecord(0192…)`, so ids in debug logs say what they point at.
impl<T> Debug for TypedUuid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}({})", Self::record_name(), self.0)
    }
}

impl<T> Display for TypedUuid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedUuid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedUuid<T> {}

impl<T> Hash for TypedUuid<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedUuid<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedUuid<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<Uuid> for TypedUuid<T> {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl<T> From<TypedUuid<T>> for Uuid {
    fn from(value: TypedUuid<T>) -> Self {
        value.into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct CartRecord;

    type CartUuid = TypedUuid<CartRecord>;

    #[test]
    fn debug_names_the_record_type() {
        let id = CartUuid::from_uuid(Uuid::nil());

        assert_eq!(
            format!("{id:?}"),
            "CartRecord(00000000-0000-0000-0000-000000000000)"
        );
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn new_ids_sort_by_creation() {
        let first = CartUuid::new();
        let second = CartUuid::new();

        assert!(first < second, "v7 ids should be monotonic");
        assert_eq!(first.into_uuid().get_version_num(), 7);
    }

    #[test]
    fn converts_to_and_from_plain_uuids() {
        let raw = Uuid::now_v7();
        let typed: CartUuid = raw.into();

        assert_eq!(Uuid::from(typed), raw);
        assert_eq!(typed, CartUuid::from_uuid(raw));
    }
}
