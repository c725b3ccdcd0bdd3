//! Statistics and introspection for crit-bit trees.
//!
//! Gathers counts of internal nodes per [`Shape`], the number of entries and the
//! height of the tree. Useful for checking how keys spread over the tree and how many
//! nodes are inlined.

use std::collections::HashMap;

use crate::factory::NodeFactory;
use crate::node::{NodeRef, Shape};
use crate::tree::CritBitTree;

pub trait TreeStatsTrait {
    fn get_tree_stats(&self) -> TreeStats;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStats {
    pub shape: Shape,
    pub total_nodes: usize,
    /// Inlined entries held by nodes of this shape.
    pub total_inlined: usize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeStats {
    pub node_stats: HashMap<Shape, NodeStats>,
    pub num_leaves: usize,
    pub num_inner_nodes: usize,
    /// Longest root to entry path, counting the entry. `0` for an empty tree.
    pub max_height: usize,
    /// Mean depth of an entry, `0.0` for an empty tree.
    pub avg_leaf_depth: f64,
}

fn inlined_count(shape: Shape) -> usize {
    match shape {
        Shape::ShortBoth => 2,
        Shape::ShortLeft | Shape::ShortRight => 1,
        Shape::Tall => 0,
    }
}

impl<K, V, A, F: NodeFactory<K, V>> TreeStatsTrait for CritBitTree<K, V, A, F> {
    fn get_tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let Some(root) = self.root() else {
            return stats;
        };

        let mut total_depth = 0;
        let mut stack = vec![(root, 1)];
        while let Some((node, height)) = stack.pop() {
            stats.max_height = stats.max_height.max(height);
            match node {
                NodeRef::Leaf(_) => {
                    stats.num_leaves += 1;
                    total_depth += height;
                }
                NodeRef::Internal(internal) => {
                    let shape = internal.shape();
                    stats
                        .node_stats
                        .entry(shape)
                        .and_modify(|e| {
                            e.total_nodes += 1;
                            e.total_inlined += inlined_count(shape);
                        })
                        .or_insert(NodeStats {
                            shape,
                            total_nodes: 1,
                            total_inlined: inlined_count(shape),
                        });
                    stack.push((internal.left(), height + 1));
                    stack.push((internal.right(), height + 1));
                }
            }
        }

        stats.num_inner_nodes = stats.node_stats.values().map(|ns| ns.total_nodes).sum();
        stats.avg_leaf_depth = total_depth as f64 / stats.num_leaves as f64;
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::keys::{ByteAnalyzer, IntAnalyzer};
    use crate::node::Shape;
    use crate::stats::TreeStatsTrait;
    use crate::tree::{MutableCritBitTree, PersistentCritBitTree};

    #[test]
    fn test_empty_tree_stats() {
        let tree = MutableCritBitTree::<&str, (), _>::new(ByteAnalyzer);
        let stats = tree.get_tree_stats();
        assert_eq!(stats.num_leaves, 0);
        assert_eq!(stats.num_inner_nodes, 0);
        assert_eq!(stats.max_height, 0);
        assert_eq!(stats.avg_leaf_depth, 0.0);
    }

    #[test]
    fn test_a_b_ab_stats() {
        let mut tree = MutableCritBitTree::new(ByteAnalyzer);
        tree.put("a", ());
        let stats = tree.get_tree_stats();
        assert_eq!((stats.num_leaves, stats.num_inner_nodes, stats.max_height), (1, 0, 1));

        tree.put("b", ());
        tree.put("ab", ());
        let stats = tree.get_tree_stats();
        assert_eq!(stats.num_leaves, 3);
        assert_eq!(stats.num_inner_nodes, 2);
        assert_eq!(stats.max_height, 3);
        assert_eq!(stats.node_stats[&Shape::ShortBoth].total_nodes, 1);
        assert_eq!(stats.node_stats[&Shape::ShortRight].total_inlined, 1);
        assert!(!stats.node_stats.contains_key(&Shape::Tall));
    }

    #[test]
    fn test_every_entry_inlined_once() {
        let mut tree = PersistentCritBitTree::new(IntAnalyzer::<u32>::new());
        for i in 0..1000u32 {
            tree.put(i.wrapping_mul(2_654_435_761), i);
        }
        let stats = tree.get_tree_stats();
        let inlined: usize = stats.node_stats.values().map(|ns| ns.total_inlined).sum();
        assert_eq!(stats.num_leaves, 1000);
        assert_eq!(inlined, 1000);
        assert_eq!(stats.num_inner_nodes, 999);
        assert!(stats.max_height <= 33);
    }

    #[test]
    fn test_dense_keys_balanced() {
        let mut tree = MutableCritBitTree::new(IntAnalyzer::<u16>::new());
        for i in 0..1024u16 {
            tree.put(i, ());
        }
        let stats = tree.get_tree_stats();
        assert_eq!(stats.max_height, 11);
        assert_eq!(stats.avg_leaf_depth, 11.0);
        assert_eq!(stats.node_stats[&Shape::ShortBoth].total_nodes, 512);
        assert_eq!(stats.node_stats[&Shape::Tall].total_nodes, 511);
    }
}
