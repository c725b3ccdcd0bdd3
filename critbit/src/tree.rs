//! Crit-bit tree implementation.
//!
//! This module contains [`CritBitTree`], which is generic over the key analyzer and the
//! node factory. The same search, insertion and removal code runs for both the
//! in-place [`MutableCritBitTree`] and the copy-on-write [`PersistentCritBitTree`].

use std::fmt::{Debug, Formatter};

use crate::context::Context;
use crate::factory::{MutableNodeFactory, NodeFactory, PersistentNodeFactory};
use crate::iter::{Iter, Keys, Values};
use crate::keys::{KeyAnalyzer, PrefixAnalyzer};
use crate::node::{Child, Direction, Internal, NodeRef};
use crate::search::{SearchResult, descend};

/// An ordered map over a crit-bit (PATRICIA) tree.
///
/// Keys are ordered by their bit representation as reported by the analyzer `A`, and
/// each internal node tests exactly one bit. The factory `F` decides how nodes are owned:
/// [`MutableNodeFactory`] boxes them and edits in place, [`PersistentNodeFactory`]
/// shares them between versions and copies on write.
///
/// ## Examples
///
/// ```rust
/// use critbit::{ByteAnalyzer, MutableCritBitTree};
///
/// let mut tree = MutableCritBitTree::new(ByteAnalyzer);
/// assert_eq!(tree.put("apple", 1), None);
/// assert_eq!(tree.put("application", 2), None);
/// assert_eq!(tree.put("apple", 3), Some(1));
///
/// assert_eq!(tree.size(), 2);
/// assert_eq!(tree.get(&"apple"), Some(&3));
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, ["apple", "application"]);
/// ```
pub struct CritBitTree<K, V, A, F: NodeFactory<K, V> = MutableNodeFactory> {
    root: Option<Child<K, V, F>>,
    size: usize,
    ctx: Context<A, F>,
}

/// A crit-bit tree whose nodes are exclusively owned and mutated in place.
pub type MutableCritBitTree<K, V, A> = CritBitTree<K, V, A, MutableNodeFactory>;

/// A crit-bit tree whose versions share unmodified subtrees.
///
/// Cloning (or [`CritBitTree::snapshot`]) is O(1). Updating either copy only copies the
/// nodes along the updated path.
pub type PersistentCritBitTree<K, V, A> = CritBitTree<K, V, A, PersistentNodeFactory>;

impl<K, V, A: Default, F: NodeFactory<K, V> + Default> Default for CritBitTree<K, V, A, F> {
    fn default() -> Self {
        Self::with_factory(A::default(), F::default())
    }
}

impl<K, V, A, F: NodeFactory<K, V>> CritBitTree<K, V, A, F> {
    /// Create a new empty tree using `analyzer` for its keys.
    pub fn new(analyzer: A) -> Self
    where
        F: Default,
    {
        Self::with_factory(analyzer, F::default())
    }

    /// Create a new empty tree with an explicit node factory.
    pub fn with_factory(analyzer: A, factory: F) -> Self {
        Self {
            root: None,
            size: 0,
            ctx: Context::new(analyzer, factory),
        }
    }

    /// Number of distinct keys in the tree.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }

    /// The root node, `None` for an empty tree. A tree holding one entry has a leaf root.
    pub fn root(&self) -> Option<NodeRef<'_, K, V, F>> {
        self.root.as_ref().map(Child::node_ref)
    }

    pub fn context(&self) -> &Context<A, F> {
        &self.ctx
    }

    /// Iterate over all entries in ascending bit order.
    pub fn iter(&self) -> Iter<'_, K, V, F> {
        Iter::new(self.root(), Some(self.size))
    }

    pub fn keys(&self) -> Keys<'_, K, V, F> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V, F> {
        Values::new(self.iter())
    }

    /// The entry with the smallest key in bit order.
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.root()?.outermost(Direction::Left);
        Some((leaf.key(), leaf.value()))
    }

    /// The entry with the largest key in bit order.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.root()?.outermost(Direction::Right);
        Some((leaf.key(), leaf.value()))
    }
}

impl<K, V, A, F> CritBitTree<K, V, A, F>
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    /// Insert `value` under `key`.
    ///
    /// # Returns
    ///
    /// - `Some(old_value)` if `key` was present; the tree's shape and size are unchanged
    /// - `None` if this was a new key; the size grows by one
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let ctx = &self.ctx;
        let root = match &mut self.root {
            Some(root) => root,
            None => {
                self.root = Some(Child::External(ctx.factory().make_leaf(key, value)));
                self.size += 1;
                return None;
            }
        };

        if let Child::External(leaf) = &*root {
            let diff = ctx.analyzer().differing_bit(&key, leaf.key());
            let previous = root.insert(diff, key, value, ctx);
            if diff.is_some() {
                self.size += 1;
            }
            return previous;
        }

        // One key comparison, against whatever entry the key's bits lead to.
        let (diff, parent) = {
            let found = descend(root, &key, ctx.analyzer());
            let diff = ctx.analyzer().differing_bit(&key, found.key());
            (diff, found.parent_bit().map(|bit| (bit, found.direction)))
        };

        // Copying shared nodes may run `Clone` on keys and values, so the size only
        // changes once the entry is in place.
        let previous = match (parent, diff) {
            (None, _) => root.insert(diff, key, value, ctx),
            (Some((parent_bit, _)), Some(bit)) if bit < parent_bit => {
                rewalk(root, bit, key, value, ctx)
            }
            (Some((parent_bit, direction)), _) => {
                debug_assert_ne!(diff, Some(parent_bit));
                walk_to_bit(root, &key, parent_bit, ctx).set_side(direction, diff, key, value, ctx)
            }
        };
        if diff.is_some() {
            self.size += 1;
        }
        previous
    }

    /// Blind descent towards `key`: the entry sharing the longest bit prefix with `key`
    /// along the path its bits select. `None` for an empty tree.
    pub fn search(&self, key: &K) -> Option<SearchResult<'_, K, V, F>> {
        Some(descend(self.root.as_ref()?, key, self.ctx.analyzer()))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let found = self.search(key)?;
        match self.ctx.analyzer().differing_bit(key, found.key()) {
            None => Some(found.value()),
            Some(_) => None,
        }
    }

    /// Mutable access to the value under `key`. For a persistent tree this copies the
    /// path to the entry if it is shared with another version.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let ctx = &self.ctx;
        let root = self.root.as_mut()?;
        let (parent_bit, direction) = {
            let found = descend(root, key, ctx.analyzer());
            if ctx.analyzer().differing_bit(key, found.key()).is_some() {
                return None;
            }
            (found.parent_bit(), found.direction)
        };

        let side = match parent_bit {
            None => root,
            Some(bit) => walk_to_bit(root, key, bit, ctx).side_mut(direction),
        };
        match side {
            Child::External(leaf) => Some(&mut leaf.value),
            _ => unreachable!("search ended on a subtree"),
        }
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value if it was present.
    ///
    /// The removed entry's parent node is replaced by the entry's sibling, so the tree
    /// keeps exactly one internal node per pair of neighbouring entries.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let ctx = &self.ctx;
        let root = self.root.as_mut()?;
        let (parent_bit, direction) = {
            let found = descend(root, key, ctx.analyzer());
            if ctx.analyzer().differing_bit(key, found.key()).is_some() {
                return None;
            }
            (found.parent_bit(), found.direction)
        };

        let Some(parent_bit) = parent_bit else {
            self.size -= 1;
            return match self.root.take() {
                Some(Child::External(leaf)) => Some(leaf.into_parts().1),
                _ => unreachable!("single entry tree without a leaf root"),
            };
        };
        let slot = walk_to_slot(root, key, parent_bit, ctx);
        let value = collapse(slot, direction, ctx.factory());
        self.size -= 1;
        Some(value)
    }

    /// Iterate over every entry whose key starts with `prefix`, in ascending bit order.
    pub fn prefix_iter(&self, prefix: &K) -> Iter<'_, K, V, F>
    where
        A: PrefixAnalyzer<K>,
    {
        let analyzer = self.ctx.analyzer();
        let Some(mut node) = self.root() else {
            return Iter::new(None, Some(0));
        };

        let prefix_bits = analyzer.bit_length(prefix);
        while let NodeRef::Internal(internal) = node {
            if internal.bit() >= prefix_bits {
                break;
            }
            node = internal.child(Direction::from_bit(
                analyzer.is_bit_set(prefix, internal.bit()),
            ));
        }

        // Every key below `node` agrees on the first `prefix_bits` bits, so checking one
        // of them decides for all.
        if analyzer.is_prefix(prefix, node.outermost(Direction::Left).key()) {
            Iter::new(Some(node), None)
        } else {
            Iter::new(None, Some(0))
        }
    }
}

impl<K: Clone, V: Clone, A: Clone> CritBitTree<K, V, A, PersistentNodeFactory> {
    /// Take an O(1) snapshot sharing every node with this tree.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

impl<K: Clone, V: Clone, A: KeyAnalyzer<K> + Clone> CritBitTree<K, V, A, PersistentNodeFactory> {
    /// A new version with `value` under `key`, leaving this one untouched.
    pub fn update(&self, key: K, value: V) -> Self {
        let mut next = self.snapshot();
        next.put(key, value);
        next
    }

    /// A new version without `key`, leaving this one untouched.
    pub fn without(&self, key: &K) -> Self {
        let mut next = self.snapshot();
        next.remove(key);
        next
    }
}

impl<K: Clone, V: Clone, A: Clone> Clone for CritBitTree<K, V, A, PersistentNodeFactory> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            ctx: self.ctx.clone(),
        }
    }
}

impl<K: Clone, V: Clone, A: Clone> Clone for CritBitTree<K, V, A, MutableNodeFactory> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.as_ref().map(Child::deep_clone),
            size: self.size,
            ctx: self.ctx.clone(),
        }
    }
}

impl<K, V, A, F> FromIterator<(K, V)> for CritBitTree<K, V, A, F>
where
    A: KeyAnalyzer<K> + Default,
    F: NodeFactory<K, V> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K, V, A, F> Extend<(K, V)> for CritBitTree<K, V, A, F>
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V, A, F: NodeFactory<K, V>> IntoIterator for &'a CritBitTree<K, V, A, F> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Debug, V: Debug, A, F: NodeFactory<K, V>> Debug for CritBitTree<K, V, A, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Walks from the root along `key` to the internal node testing `bit`, making each node
/// on the way editable.
fn walk_to_bit<'t, K, V, A, F>(
    root: &'t mut Child<K, V, F>,
    key: &K,
    bit: usize,
    ctx: &Context<A, F>,
) -> &'t mut Internal<K, V, F>
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    let Child::Subtree(handle) = root else {
        unreachable!("walk from an inlined root");
    };
    let mut node = ctx.factory().edit(handle);
    while node.bit() != bit {
        let direction = Direction::from_bit(ctx.analyzer().is_bit_set(key, node.bit()));
        node = match node.side_mut(direction) {
            Child::Subtree(handle) => ctx.factory().edit(handle),
            _ => unreachable!("bit {bit} is not on the key's path"),
        };
    }
    node
}

/// Walks from the root along `key` to the slot holding the internal node testing `bit`.
fn walk_to_slot<'t, K, V, A, F>(
    root: &'t mut Child<K, V, F>,
    key: &K,
    bit: usize,
    ctx: &Context<A, F>,
) -> &'t mut Child<K, V, F>
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    let mut slot = root;
    loop {
        if matches!(&*slot, Child::Subtree(handle) if handle.bit() == bit) {
            return slot;
        }
        let current = slot;
        slot = match current {
            Child::Subtree(handle) => {
                let node = ctx.factory().edit(handle);
                let direction = Direction::from_bit(ctx.analyzer().is_bit_set(key, node.bit()));
                node.side_mut(direction)
            }
            _ => unreachable!("bit {bit} is not on the key's path"),
        };
    }
}

/// Splices a branch at `bit` when the blind descent went past it.
///
/// The descent only remembers the last internal node it passed, but `bit` may belong
/// between two nodes higher up. Walk down again from the root until the adjacent pair
/// with `prev.bit < bit < next.bit` is found (or `bit` is above the root) and splice
/// there. Each step goes one level down, and since bits strictly increase along the
/// path the pair always exists.
fn rewalk<K, V, A, F>(
    root: &mut Child<K, V, F>,
    bit: usize,
    key: K,
    value: V,
    ctx: &Context<A, F>,
) -> Option<V>
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    if !matches!(&*root, Child::Subtree(handle) if handle.bit() < bit) {
        return root.insert(Some(bit), key, value, ctx);
    }
    let Child::Subtree(handle) = root else {
        unreachable!()
    };

    let mut prev = ctx.factory().edit(handle);
    loop {
        debug_assert_ne!(prev.bit(), bit);
        let direction = Direction::from_bit(ctx.analyzer().is_bit_set(&key, prev.bit()));
        let straddles = match prev.side(direction) {
            Child::Subtree(next) => bit < next.bit(),
            _ => true,
        };
        if straddles {
            return prev.set_side(direction, Some(bit), key, value, ctx);
        }
        prev = match prev.side_mut(direction) {
            Child::Subtree(next) => ctx.factory().edit(next),
            _ => unreachable!(),
        };
    }
}

/// Removes the entry on the `removed` side of the node held in `slot`, putting the
/// node's other side in its place.
///
/// The node is made editable while still in its slot, so a panicking copy leaves the
/// slot intact, and the `unwrap` that follows never has to copy.
fn collapse<K, V, F: NodeFactory<K, V>>(
    slot: &mut Child<K, V, F>,
    removed: Direction,
    factory: &F,
) -> V {
    match slot {
        Child::Subtree(handle) => {
            factory.edit(handle);
        }
        _ => unreachable!("collapse of an inlined slot"),
    }
    let Child::Subtree(handle) = std::mem::replace(slot, Child::Vacant) else {
        unreachable!()
    };
    let (gone, kept) = factory.unwrap(handle).into_sides(removed);
    *slot = kept;
    match gone {
        Child::External(leaf) => leaf.into_parts().1,
        _ => unreachable!("removed entry is not inlined"),
    }
}
