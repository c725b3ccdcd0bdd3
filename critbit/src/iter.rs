use crate::factory::NodeFactory;
use crate::node::{Direction, NodeRef};

/// In-order iterator over the entries of a tree or subtree.
///
/// Holds the right-hand sides still to visit on a stack, so memory use is bounded by
/// the tree height.
pub struct Iter<'a, K, V, F: NodeFactory<K, V>> {
    stack: Vec<NodeRef<'a, K, V, F>>,
    remaining: Option<usize>,
}

impl<'a, K, V, F: NodeFactory<K, V>> Iter<'a, K, V, F> {
    /// `len` is the exact number of entries below `node`, when known.
    pub(crate) fn new(node: Option<NodeRef<'a, K, V, F>>, len: Option<usize>) -> Self {
        Self {
            stack: node.into_iter().collect(),
            remaining: len,
        }
    }
}

impl<'a, K, V, F: NodeFactory<K, V>> Iterator for Iter<'a, K, V, F> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        loop {
            match node {
                NodeRef::Leaf(leaf) => {
                    if let Some(remaining) = &mut self.remaining {
                        *remaining -= 1;
                    }
                    return Some((leaf.key(), leaf.value()));
                }
                NodeRef::Internal(internal) => {
                    self.stack.push(internal.child(Direction::Right));
                    node = internal.child(Direction::Left);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(remaining) => (remaining, Some(remaining)),
            None => (self.stack.len(), None),
        }
    }
}

pub struct Keys<'a, K, V, F: NodeFactory<K, V>> {
    inner: Iter<'a, K, V, F>,
}

impl<'a, K, V, F: NodeFactory<K, V>> Keys<'a, K, V, F> {
    pub(crate) fn new(inner: Iter<'a, K, V, F>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V, F: NodeFactory<K, V>> Iterator for Keys<'a, K, V, F> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V, F: NodeFactory<K, V>> {
    inner: Iter<'a, K, V, F>,
}

impl<'a, K, V, F: NodeFactory<K, V>> Values<'a, K, V, F> {
    pub(crate) fn new(inner: Iter<'a, K, V, F>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V, F: NodeFactory<K, V>> Iterator for Values<'a, K, V, F> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use crate::keys::IntAnalyzer;
    use crate::tree::MutableCritBitTree;

    #[test]
    fn test_iter_empty() {
        let tree = MutableCritBitTree::<u32, u32, _>::new(IntAnalyzer::<u32>::new());
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_iter_size_hint_counts_down() {
        let mut tree = MutableCritBitTree::new(IntAnalyzer::<u32>::new());
        for i in [5, 1, 9, 3] {
            tree.put(i, ());
        }
        let mut iter = tree.iter();
        assert_eq!(iter.size_hint(), (4, Some(4)));
        assert_eq!(iter.next().map(|(k, _)| *k), Some(1));
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_keys_and_values() {
        let mut tree = MutableCritBitTree::new(IntAnalyzer::<i64>::new());
        for i in [-2i64, 7, 0, -9] {
            tree.put(i, i * 10);
        }
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [-9, -2, 0, 7]);
        assert_eq!(tree.values().copied().collect::<Vec<_>>(), [-90, -20, 0, 70]);
        let mut total = 0;
        for (_, v) in &tree {
            total += v;
        }
        assert_eq!(total, -40);
    }
}
