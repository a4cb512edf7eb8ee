//! Values on the stack of the secondary stack machine.
//!
//! Accessors are strict: asking for a variant the item does not hold returns
//! [`StackItemError::TypeMismatch`] and never converts between variants.

use num_bigint::BigInt;
use std::{
    fmt,
    sync::Arc,
};

/// An object owned by the host and referenced from the stack.
pub trait InteropInterface: fmt::Debug + Send + Sync {
    fn interface_name(&self) -> &str;
}

/// A shared reference to an interop object. Two handles are equal only when they point at
/// the same object.
#[derive(Clone, Debug)]
pub struct InteropHandle(Arc<dyn InteropInterface>);

impl InteropHandle {
    pub fn new<T: InteropInterface + 'static>(object: T) -> Self {
        Self(Arc::new(object))
    }

    pub fn object(&self) -> &dyn InteropInterface {
        self.0.as_ref()
    }
}

impl PartialEq for InteropHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0).cast::<()>(),
            Arc::as_ptr(&other.0).cast::<()>(),
        )
    }
}

impl Eq for InteropHandle {}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display, strum_macros::IntoStaticStr,
)]
pub enum StackItemKind {
    Integer,
    Boolean,
    ByteArray,
    Array,
    Interop,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StackItemError {
    #[error("expected a stack item of kind {expected}, found {found}")]
    TypeMismatch {
        expected: StackItemKind,
        found: StackItemKind,
    },
}

/// A single stack value. Cloning copies the whole payload; only interop handles are shared.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum StackItem {
    Integer(BigInt),
    Boolean(bool),
    ByteArray(Vec<u8>),
    Array(Vec<StackItem>),
    Interop(InteropHandle),
}

impl StackItem {
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Self::Integer(value.into())
    }

    pub fn kind(&self) -> StackItemKind {
        match self {
            Self::Integer(_) => StackItemKind::Integer,
            Self::Boolean(_) => StackItemKind::Boolean,
            Self::ByteArray(_) => StackItemKind::ByteArray,
            Self::Array(_) => StackItemKind::Array,
            Self::Interop(_) => StackItemKind::Interop,
        }
    }

    fn mismatch(&self, expected: StackItemKind) -> StackItemError {
        StackItemError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_integer(&self) -> Result<&BigInt, StackItemError> {
        match self {
            Self::Integer(value) => Ok(value),
            other => Err(other.mismatch(StackItemKind::Integer)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, StackItemError> {
        match self {
            Self::Boolean(value) => Ok(*value),
            other => Err(other.mismatch(StackItemKind::Boolean)),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], StackItemError> {
        match self {
            Self::ByteArray(bytes) => Ok(bytes),
            other => Err(other.mismatch(StackItemKind::ByteArray)),
        }
    }

    pub fn as_array(&self) -> Result<&[StackItem], StackItemError> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(other.mismatch(StackItemKind::Array)),
        }
    }

    pub fn as_interop(&self) -> Result<&InteropHandle, StackItemError> {
        match self {
            Self::Interop(handle) => Ok(handle),
            other => Err(other.mismatch(StackItemKind::Interop)),
        }
    }

    /// Takes the elements out of an array item.
    pub fn into_array(self) -> Result<Vec<StackItem>, StackItemError> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(other.mismatch(StackItemKind::Array)),
        }
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[derive(Debug)]
    struct Storage(u8);

    impl InteropInterface for Storage {
        fn interface_name(&self) -> &str {
            "storage"
        }
    }

    fn accessor_kinds(item: &StackItem) -> Vec<(StackItemKind, bool)> {
        vec![
            (StackItemKind::Integer, item.as_integer().is_ok()),
            (StackItemKind::Boolean, item.as_bool().is_ok()),
            (StackItemKind::ByteArray, item.as_bytes().is_ok()),
            (StackItemKind::Array, item.as_array().is_ok()),
            (StackItemKind::Interop, item.as_interop().is_ok()),
        ]
    }

    fn arb_item() -> impl Strategy<Value = StackItem> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(StackItem::integer),
            any::<bool>().prop_map(StackItem::from),
            prop::collection::vec(any::<u8>(), 0..8).prop_map(StackItem::from),
            any::<u8>().prop_map(|tag| StackItem::from(InteropHandle::new(Storage(tag)))),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(StackItem::Array)
        })
    }

    #[test_case(StackItem::integer(7) => StackItemKind::Integer)]
    #[test_case(StackItem::from(true) => StackItemKind::Boolean)]
    #[test_case(StackItem::from(vec![1u8, 2]) => StackItemKind::ByteArray)]
    #[test_case(StackItem::from(vec![StackItem::from(false)]) => StackItemKind::Array)]
    #[test_case(StackItem::from(InteropHandle::new(Storage(0))) => StackItemKind::Interop)]
    fn kind__matches_the_variant(item: StackItem) -> StackItemKind {
        item.kind()
    }

    #[test]
    fn wrong_accessor__reports_both_kinds() {
        let item = StackItem::from(vec![0xAAu8]);
        assert_eq!(
            item.as_integer(),
            Err(StackItemError::TypeMismatch {
                expected: StackItemKind::Integer,
                found: StackItemKind::ByteArray,
            })
        );
        assert_eq!(
            item.as_bool().unwrap_err().to_string(),
            "expected a stack item of kind Boolean, found ByteArray"
        );
        assert_eq!(item.as_bytes(), Ok(&[0xAAu8][..]));
    }

    #[test]
    fn interop_handles_compare_by_identity() {
        let handle = InteropHandle::new(Storage(1));
        let same = StackItem::from(handle.clone());
        let twin = StackItem::from(InteropHandle::new(Storage(1)));

        assert_eq!(StackItem::from(handle.clone()), same);
        assert_ne!(same, twin);
        assert_eq!(handle.object().interface_name(), "storage");
    }

    #[test]
    fn clone__copies_nested_arrays() {
        let original = StackItem::from(vec![
            StackItem::integer(1),
            StackItem::from(vec![StackItem::from(vec![9u8])]),
        ]);
        let copy = original.clone();
        assert_eq!(copy, original);

        let mut elements = copy.into_array().unwrap();
        elements.push(StackItem::from(true));
        assert_eq!(original.as_array().unwrap().len(), 2);
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn equal_payloads_of_different_kinds_differ() {
        assert_ne!(StackItem::integer(1), StackItem::from(true));
        assert_ne!(StackItem::from(Vec::<u8>::new()), StackItem::from(Vec::<StackItem>::new()));
        assert_ne!(StackItem::integer(0), StackItem::from(vec![0u8]));
    }

    proptest! {
        #[test]
        fn exactly_one_accessor_succeeds(item in arb_item()) {
            let kinds = accessor_kinds(&item);
            let succeeded: Vec<_> =
                kinds.iter().filter(|(_, ok)| *ok).map(|(kind, _)| *kind).collect();
            prop_assert_eq!(succeeded, vec![item.kind()]);
        }

        #[test]
        fn items_of_different_kinds_are_never_equal(a in arb_item(), b in arb_item()) {
            if a.kind() != b.kind() {
                prop_assert_ne!(a, b);
            }
        }

        #[test]
        fn clone_is_equal(item in arb_item()) {
            prop_assert_eq!(item.clone(), item);
        }
    }
}
