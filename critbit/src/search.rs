//! Blind descent.
//!
//! Walks from the root to an inlined entry by testing one key bit per internal node and
//! never comparing whole keys. The entry reached is the only one the caller then has to
//! compare against: the first bit at which it differs from the searched key tells where
//! the key is, or would be, in the tree.

use crate::factory::NodeFactory;
use crate::keys::KeyAnalyzer;
use crate::node::{Child, Direction, Internal, Leaf};

/// Outcome of a blind descent.
pub struct SearchResult<'a, K, V, F: NodeFactory<K, V>> {
    /// The last internal node passed, `None` if the root is a single entry.
    pub parent: Option<&'a Internal<K, V, F>>,
    /// The side of `parent` the entry sits on. `Left` when there is no parent.
    pub direction: Direction,
    /// The entry the descent ended at.
    pub leaf: &'a Leaf<K, V>,
}

impl<'a, K, V, F: NodeFactory<K, V>> SearchResult<'a, K, V, F> {
    #[inline]
    pub fn key(&self) -> &'a K {
        self.leaf.key()
    }

    #[inline]
    pub fn value(&self) -> &'a V {
        self.leaf.value()
    }

    /// The branch bit of the parent, if any.
    #[inline]
    pub fn parent_bit(&self) -> Option<usize> {
        self.parent.map(Internal::bit)
    }
}

pub(crate) fn descend<'a, K, V, A, F>(
    root: &'a Child<K, V, F>,
    key: &K,
    analyzer: &A,
) -> SearchResult<'a, K, V, F>
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    let mut parent = None;
    let mut direction = Direction::Left;
    let mut current = root;
    loop {
        match current {
            Child::External(leaf) => {
                return SearchResult {
                    parent,
                    direction,
                    leaf,
                };
            }
            Child::Subtree(handle) => {
                let node: &'a Internal<K, V, F> = &**handle;
                direction = Direction::from_bit(analyzer.is_bit_set(key, node.bit()));
                parent = Some(node);
                current = node.side(direction);
            }
            Child::Vacant => unreachable!("search through a vacant slot"),
        }
    }
}
