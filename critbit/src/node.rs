//! Node representation.
//!
//! A tree is made of [`Internal`] nodes, each of which tests one bit of the key. Each
//! side of an internal node is either an inlined (key, value) pair or an owned subtree,
//! so a terminal entry never costs a separate allocation. The four combinations are
//! reported as a [`Shape`].

use std::fmt::{Debug, Formatter};

use crate::context::Context;
use crate::factory::{MutableNodeFactory, NodeFactory};
use crate::keys::KeyAnalyzer;

/// Which side of an internal node a key routes to. A clear bit goes left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn from_bit(set: bool) -> Self {
        if set { Direction::Right } else { Direction::Left }
    }
}

/// The representation of an internal node, determined by which sides are inlined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// Both sides are inlined pairs.
    ShortBoth,
    /// Left side inlined, right side an owned subtree.
    ShortLeft,
    /// Left side an owned subtree, right side inlined.
    ShortRight,
    /// Both sides are owned subtrees.
    Tall,
}

/// A single (key, value) entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Leaf<K, V> {
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// One side of an internal node, and the tree root.
pub(crate) enum Child<K, V, F: NodeFactory<K, V>> {
    External(Leaf<K, V>),
    Subtree(F::Handle),
    /// Placeholder while a subtree is moved out of its slot. Never left behind.
    Vacant,
}

impl<K, V, F> Clone for Child<K, V, F>
where
    K: Clone,
    V: Clone,
    F: NodeFactory<K, V>,
    F::Handle: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Child::External(leaf) => Child::External(leaf.clone()),
            Child::Subtree(handle) => Child::Subtree(handle.clone()),
            Child::Vacant => Child::Vacant,
        }
    }
}

impl<K, V, F: NodeFactory<K, V>> Child<K, V, F> {
    #[inline]
    pub(crate) fn is_external(&self) -> bool {
        matches!(self, Child::External(_))
    }

    pub(crate) fn node_ref(&self) -> NodeRef<'_, K, V, F> {
        match self {
            Child::External(leaf) => NodeRef::Leaf(leaf),
            Child::Subtree(handle) => NodeRef::Internal(&**handle),
            Child::Vacant => unreachable!("vacant slot observed outside of a displacement"),
        }
    }

    /// Installs `key`/`value` in this slot, `diff` being the first bit at which `key`
    /// differs from the keys already below it (`None` if it equals one of them).
    ///
    /// - An inlined pair is overwritten on `None`, or pushed down together with the new
    ///   pair into a fresh two-leaf node at `diff`.
    /// - A subtree testing a bit past `diff` is displaced: a new node at `diff` takes
    ///   the subtree on one side and the new pair on the other.
    /// - Otherwise the subtree's own [`Internal::insert`] continues the descent.
    pub(crate) fn insert<A: KeyAnalyzer<K>>(
        &mut self,
        diff: Option<usize>,
        key: K,
        value: V,
        ctx: &Context<A, F>,
    ) -> Option<V> {
        match self {
            Child::External(leaf) => {
                let Some(bit) = diff else {
                    return Some(std::mem::replace(&mut leaf.value, value));
                };
                let goes_right = ctx.analyzer().is_bit_set(&key, bit);
                let Child::External(existing) = std::mem::replace(self, Child::Vacant) else {
                    unreachable!()
                };
                let new_leaf = ctx.factory().make_leaf(key, value);
                let (left, right) = if goes_right {
                    (existing, new_leaf)
                } else {
                    (new_leaf, existing)
                };
                *self = Child::Subtree(ctx.factory().make_short_both(bit, left, right));
                None
            }
            Child::Subtree(handle) => match diff {
                Some(bit) if bit < handle.bit() => {
                    let goes_right = ctx.analyzer().is_bit_set(&key, bit);
                    let Child::Subtree(displaced) = std::mem::replace(self, Child::Vacant)
                    else {
                        unreachable!()
                    };
                    let new_leaf = ctx.factory().make_leaf(key, value);
                    let branch = if goes_right {
                        ctx.factory().make_short_right(bit, displaced, new_leaf)
                    } else {
                        ctx.factory().make_short_left(bit, new_leaf, displaced)
                    };
                    *self = Child::Subtree(branch);
                    None
                }
                _ => ctx.factory().edit(handle).insert(diff, key, value, ctx),
            },
            Child::Vacant => unreachable!("insert into a vacant slot"),
        }
    }
}

/// An internal node testing bit [`Internal::bit`].
///
/// Every key on the left side has that bit clear, every key on the right side has it
/// set, and every bit tested further down is strictly greater.
pub struct Internal<K, V, F: NodeFactory<K, V>> {
    bit: usize,
    left: Child<K, V, F>,
    right: Child<K, V, F>,
}

impl<K, V, F> Clone for Internal<K, V, F>
where
    K: Clone,
    V: Clone,
    F: NodeFactory<K, V>,
    F::Handle: Clone,
{
    fn clone(&self) -> Self {
        Self {
            bit: self.bit,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

// `Box<T>: Clone` needs `T: Clone`, which makes the generic impls above cyclic for boxed
// nodes. Owned trees are copied explicitly instead.
impl<K: Clone, V: Clone> Child<K, V, MutableNodeFactory> {
    pub(crate) fn deep_clone(&self) -> Self {
        match self {
            Child::External(leaf) => Child::External(leaf.clone()),
            Child::Subtree(handle) => Child::Subtree(Box::new(handle.deep_clone())),
            Child::Vacant => Child::Vacant,
        }
    }
}

impl<K: Clone, V: Clone> Internal<K, V, MutableNodeFactory> {
    pub(crate) fn deep_clone(&self) -> Self {
        Self {
            bit: self.bit,
            left: self.left.deep_clone(),
            right: self.right.deep_clone(),
        }
    }
}

impl<K, V, F: NodeFactory<K, V>> Internal<K, V, F> {
    #[inline]
    pub(crate) fn new(bit: usize, left: Child<K, V, F>, right: Child<K, V, F>) -> Self {
        Self { bit, left, right }
    }

    /// The bit this node tests.
    #[inline]
    pub fn bit(&self) -> usize {
        self.bit
    }

    #[inline]
    pub fn left(&self) -> NodeRef<'_, K, V, F> {
        self.left.node_ref()
    }

    #[inline]
    pub fn right(&self) -> NodeRef<'_, K, V, F> {
        self.right.node_ref()
    }

    #[inline]
    pub fn child(&self, direction: Direction) -> NodeRef<'_, K, V, F> {
        self.side(direction).node_ref()
    }

    #[inline]
    pub fn has_external_left(&self) -> bool {
        self.left.is_external()
    }

    #[inline]
    pub fn has_external_right(&self) -> bool {
        self.right.is_external()
    }

    pub fn shape(&self) -> Shape {
        match (self.has_external_left(), self.has_external_right()) {
            (true, true) => Shape::ShortBoth,
            (true, false) => Shape::ShortLeft,
            (false, true) => Shape::ShortRight,
            (false, false) => Shape::Tall,
        }
    }

    #[inline]
    pub(crate) fn side(&self, direction: Direction) -> &Child<K, V, F> {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    #[inline]
    pub(crate) fn side_mut(&mut self, direction: Direction) -> &mut Child<K, V, F> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Consumes the node, returning the side at `direction` followed by the other side.
    pub(crate) fn into_sides(self, direction: Direction) -> (Child<K, V, F>, Child<K, V, F>) {
        match direction {
            Direction::Left => (self.left, self.right),
            Direction::Right => (self.right, self.left),
        }
    }

    pub(crate) fn set_left<A: KeyAnalyzer<K>>(
        &mut self,
        diff: Option<usize>,
        key: K,
        value: V,
        ctx: &Context<A, F>,
    ) -> Option<V> {
        self.left.insert(diff, key, value, ctx)
    }

    pub(crate) fn set_right<A: KeyAnalyzer<K>>(
        &mut self,
        diff: Option<usize>,
        key: K,
        value: V,
        ctx: &Context<A, F>,
    ) -> Option<V> {
        self.right.insert(diff, key, value, ctx)
    }

    #[inline]
    pub(crate) fn set_side<A: KeyAnalyzer<K>>(
        &mut self,
        direction: Direction,
        diff: Option<usize>,
        key: K,
        value: V,
        ctx: &Context<A, F>,
    ) -> Option<V> {
        match direction {
            Direction::Left => self.set_left(diff, key, value, ctx),
            Direction::Right => self.set_right(diff, key, value, ctx),
        }
    }

    /// Continues an insertion below this node, on the side `key` routes to.
    ///
    /// `diff` must be past this node's bit; a branch that belongs above this node is
    /// spliced by whichever slot owns it, see [`Child::insert`].
    pub(crate) fn insert<A: KeyAnalyzer<K>>(
        &mut self,
        diff: Option<usize>,
        key: K,
        value: V,
        ctx: &Context<A, F>,
    ) -> Option<V> {
        debug_assert!(diff.is_none_or(|bit| bit > self.bit));
        let direction = Direction::from_bit(ctx.analyzer().is_bit_set(&key, self.bit));
        self.set_side(direction, diff, key, value, ctx)
    }
}

impl<K: Debug, V: Debug, F: NodeFactory<K, V>> Debug for Internal<K, V, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Internal")
            .field("bit", &self.bit)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

/// Borrowed view of a node. Inlined sides are presented as [`NodeRef::Leaf`].
pub enum NodeRef<'a, K, V, F: NodeFactory<K, V>> {
    Leaf(&'a Leaf<K, V>),
    Internal(&'a Internal<K, V, F>),
}

impl<K, V, F: NodeFactory<K, V>> Clone for NodeRef<'_, K, V, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, F: NodeFactory<K, V>> Copy for NodeRef<'_, K, V, F> {}

impl<'a, K, V, F: NodeFactory<K, V>> NodeRef<'a, K, V, F> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    pub fn as_leaf(&self) -> Option<&'a Leaf<K, V>> {
        match *self {
            NodeRef::Leaf(leaf) => Some(leaf),
            NodeRef::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&'a Internal<K, V, F>> {
        match *self {
            NodeRef::Internal(internal) => Some(internal),
            NodeRef::Leaf(_) => None,
        }
    }

    /// The bit tested by this node, `None` for a leaf.
    pub fn bit(&self) -> Option<usize> {
        self.as_internal().map(Internal::bit)
    }

    /// The entry reached by always taking `direction`.
    pub fn outermost(self, direction: Direction) -> &'a Leaf<K, V> {
        let mut node = self;
        loop {
            match node {
                NodeRef::Leaf(leaf) => return leaf,
                NodeRef::Internal(internal) => node = internal.child(direction),
            }
        }
    }
}

impl<K: Debug, V: Debug, F: NodeFactory<K, V>> Debug for NodeRef<'_, K, V, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Leaf(leaf) => leaf.fmt(f),
            NodeRef::Internal(internal) => internal.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::factory::{MutableNodeFactory, NodeFactory};
    use crate::keys::IntAnalyzer;
    use crate::node::{Child, Direction, Leaf, NodeRef, Shape};

    type Ctx = Context<IntAnalyzer<u8>, MutableNodeFactory>;

    fn ctx() -> Ctx {
        Context::new(IntAnalyzer::new(), MutableNodeFactory)
    }

    fn leaf(key: u8) -> Leaf<u8, u8> {
        Leaf::new(key, key)
    }

    #[test]
    fn test_external_overwrite() {
        let ctx = ctx();
        let mut slot: Child<u8, u8, MutableNodeFactory> = Child::External(leaf(3));
        assert_eq!(slot.insert(None, 3, 30, &ctx), Some(3));
        assert_eq!(slot.node_ref().as_leaf().map(|l| *l.value()), Some(30));
    }

    #[test]
    fn test_external_split_orders_by_bit() {
        let ctx = ctx();
        // 0b0000_0100 and 0b0000_0010 differ at bit 5; the key with the bit set goes right.
        let mut slot: Child<u8, u8, MutableNodeFactory> = Child::External(leaf(0b100));
        assert_eq!(slot.insert(Some(5), 0b010, 2, &ctx), None);

        let NodeRef::Internal(node) = slot.node_ref() else {
            panic!("expected an internal node");
        };
        assert_eq!(node.bit(), 5);
        assert_eq!(node.shape(), Shape::ShortBoth);
        assert_eq!(node.left().as_leaf().map(|l| *l.key()), Some(0b010));
        assert_eq!(node.right().as_leaf().map(|l| *l.key()), Some(0b100));
    }

    #[test]
    fn test_subtree_displacement() {
        let ctx = ctx();
        let subtree = ctx.factory().make_short_both(7, leaf(0b10), leaf(0b11));
        let mut slot: Child<u8, u8, MutableNodeFactory> = Child::Subtree(subtree);

        // 0b0110 differs from 0b1x at bit 5, above the subtree's bit 7.
        assert_eq!(slot.insert(Some(5), 0b110, 6, &ctx), None);
        let node = slot.node_ref().as_internal().unwrap();
        assert_eq!(node.bit(), 5);
        assert_eq!(node.shape(), Shape::ShortRight);
        assert_eq!(node.left().bit(), Some(7));
        assert_eq!(node.right().as_leaf().map(|l| *l.key()), Some(0b110));
    }

    #[test]
    fn test_shape_transitions() {
        let ctx = ctx();
        let mut node = ctx.factory().make_short_both(4, leaf(0b0000), leaf(0b1000));
        assert_eq!(node.shape(), Shape::ShortBoth);

        // 0b0001 joins 0b0000 on the left, at bit 7.
        ctx.factory()
            .edit(&mut node)
            .insert(Some(7), 0b0001, 1, &ctx);
        assert_eq!(node.shape(), Shape::ShortRight);

        // 0b1001 joins 0b1000 on the right.
        ctx.factory()
            .edit(&mut node)
            .insert(Some(7), 0b1001, 9, &ctx);
        assert_eq!(node.shape(), Shape::Tall);
        assert!(!node.has_external_left());
        assert!(!node.has_external_right());
    }

    #[test]
    fn test_factory_shapes() {
        let factory = MutableNodeFactory;
        let both = NodeFactory::<u8, u8>::make_short_both(&factory, 6, leaf(0), leaf(2));
        let left = factory.make_short_left(5, leaf(0), both);
        assert_eq!(left.shape(), Shape::ShortLeft);

        let other = factory.make_short_both(6, leaf(4), leaf(6));
        let right = factory.make_short_right(4, other, leaf(8));
        assert_eq!(right.shape(), Shape::ShortRight);

        let tall = factory.make_tall(0, left, right);
        assert_eq!(tall.shape(), Shape::Tall);
        assert_eq!(NodeRef::Internal(&*tall).outermost(Direction::Left).key(), &0);
        assert_eq!(NodeRef::Internal(&*tall).outermost(Direction::Right).key(), &8);
    }
}
