//! Node construction strategies.
//!
//! The insertion, search and removal algorithms only ever create or modify nodes
//! through a [`NodeFactory`]. Swapping the factory switches the tree between in-place
//! mutation ([`MutableNodeFactory`]) and persistent, structurally shared versions
//! ([`PersistentNodeFactory`]) without touching the algorithms.

use std::ops::Deref;
use std::sync::Arc;

use crate::node::{Child, Internal, Leaf};

/// Strategy for building and editing nodes.
///
/// `Handle` is the owning pointer to an internal node. The shape constructors have
/// default implementations in terms of [`NodeFactory::wrap`]; an implementation only
/// decides how nodes are owned, published and edited.
pub trait NodeFactory<K, V>: Sized {
    type Handle: Deref<Target = Internal<K, V, Self>>;

    /// Takes ownership of a freshly built node.
    fn wrap(&self, node: Internal<K, V, Self>) -> Self::Handle;

    /// Returns a node that may be mutated in place without affecting anything but the
    /// tree `handle` belongs to.
    fn edit<'h>(&self, handle: &'h mut Self::Handle) -> &'h mut Internal<K, V, Self>;

    /// Takes a node out of its handle.
    fn unwrap(&self, handle: Self::Handle) -> Internal<K, V, Self>;

    #[inline]
    fn make_leaf(&self, key: K, value: V) -> Leaf<K, V> {
        Leaf::new(key, value)
    }

    fn make_short_both(&self, bit: usize, left: Leaf<K, V>, right: Leaf<K, V>) -> Self::Handle {
        self.wrap(Internal::new(
            bit,
            Child::External(left),
            Child::External(right),
        ))
    }

    fn make_short_left(&self, bit: usize, left: Leaf<K, V>, right: Self::Handle) -> Self::Handle {
        self.wrap(Internal::new(
            bit,
            Child::External(left),
            Child::Subtree(right),
        ))
    }

    fn make_short_right(&self, bit: usize, left: Self::Handle, right: Leaf<K, V>) -> Self::Handle {
        self.wrap(Internal::new(
            bit,
            Child::Subtree(left),
            Child::External(right),
        ))
    }

    fn make_tall(&self, bit: usize, left: Self::Handle, right: Self::Handle) -> Self::Handle {
        self.wrap(Internal::new(bit, Child::Subtree(left), Child::Subtree(right)))
    }
}

/// Nodes exclusively owned by their parent and mutated in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutableNodeFactory;

impl<K, V> NodeFactory<K, V> for MutableNodeFactory {
    type Handle = Box<Internal<K, V, Self>>;

    #[inline]
    fn wrap(&self, node: Internal<K, V, Self>) -> Self::Handle {
        Box::new(node)
    }

    #[inline]
    fn edit<'h>(&self, handle: &'h mut Self::Handle) -> &'h mut Internal<K, V, Self> {
        &mut **handle
    }

    #[inline]
    fn unwrap(&self, handle: Self::Handle) -> Internal<K, V, Self> {
        *handle
    }
}

/// Nodes shared between tree versions through [`Arc`].
///
/// A node is only modified in place while the editing tree holds the sole reference to
/// it. Anything reachable from another version is copied first, so every version
/// previously handed out stays unchanged and can be read from other threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersistentNodeFactory;

impl<K: Clone, V: Clone> NodeFactory<K, V> for PersistentNodeFactory {
    type Handle = Arc<Internal<K, V, Self>>;

    #[inline]
    fn wrap(&self, node: Internal<K, V, Self>) -> Self::Handle {
        Arc::new(node)
    }

    #[inline]
    fn edit<'h>(&self, handle: &'h mut Self::Handle) -> &'h mut Internal<K, V, Self> {
        Arc::make_mut(handle)
    }

    fn unwrap(&self, handle: Self::Handle) -> Internal<K, V, Self> {
        Arc::try_unwrap(handle).unwrap_or_else(|shared| (*shared).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::factory::{NodeFactory, PersistentNodeFactory};
    use crate::node::Leaf;

    #[test]
    fn test_persistent_edit_copies_shared_nodes() {
        let factory = PersistentNodeFactory;
        let mut handle = factory.make_short_both(3, Leaf::new(0u8, 'a'), Leaf::new(16u8, 'b'));
        let published = Arc::clone(&handle);

        let edited = factory.edit(&mut handle);
        assert_eq!(edited.bit(), 3);
        assert!(!Arc::ptr_eq(&handle, &published));
        assert_eq!(Arc::strong_count(&published), 1);
    }

    #[test]
    fn test_persistent_edit_reuses_unique_nodes() {
        let factory = PersistentNodeFactory;
        let mut handle = factory.make_short_both(3, Leaf::new(0u8, 'a'), Leaf::new(16u8, 'b'));
        let before = Arc::as_ptr(&handle);
        factory.edit(&mut handle);
        assert_eq!(Arc::as_ptr(&handle), before);
    }

    #[test]
    fn test_persistent_unwrap_shared() {
        let factory = PersistentNodeFactory;
        let handle = factory.make_short_both(3, Leaf::new(0u8, 'a'), Leaf::new(16u8, 'b'));
        let published = Arc::clone(&handle);

        let node = factory.unwrap(handle);
        assert_eq!(node.bit(), 3);
        assert_eq!(published.left().as_leaf().map(|l| *l.value()), Some('a'));
    }
}
