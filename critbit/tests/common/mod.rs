//! Structural checks shared by the integration tests.

#![allow(dead_code)]

use critbit::{CritBitTree, Direction, KeyAnalyzer, NodeFactory, NodeRef};

/// Asserts every structural property of a crit-bit tree:
///
/// - branch bits strictly increase along every root to entry path;
/// - every entry agrees with the direction taken at each ancestor;
/// - each node's bit is the first bit at which its two sides differ;
/// - the number of entries equals `size()`, and iteration visits them all.
pub fn check_invariants<K, V, A, F>(tree: &CritBitTree<K, V, A, F>)
where
    A: KeyAnalyzer<K>,
    F: NodeFactory<K, V>,
{
    let analyzer = tree.context().analyzer();
    let Some(root) = tree.root() else {
        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
        return;
    };

    let mut leaves = 0;
    let mut stack: Vec<(NodeRef<'_, K, V, F>, Vec<(usize, Direction)>)> = vec![(root, vec![])];
    while let Some((node, path)) = stack.pop() {
        match node {
            NodeRef::Leaf(leaf) => {
                leaves += 1;
                for &(bit, direction) in &path {
                    assert_eq!(
                        Direction::from_bit(analyzer.is_bit_set(leaf.key(), bit)),
                        direction,
                        "entry on the wrong side of bit {bit}"
                    );
                }
            }
            NodeRef::Internal(internal) => {
                let bit = internal.bit();
                if let Some(&(parent_bit, _)) = path.last() {
                    assert!(parent_bit < bit, "bit {bit} below parent bit {parent_bit}");
                }
                let left = internal.left().outermost(Direction::Left);
                let right = internal.right().outermost(Direction::Left);
                assert_eq!(analyzer.differing_bit(left.key(), right.key()), Some(bit));

                for direction in [Direction::Left, Direction::Right] {
                    let mut child_path = path.clone();
                    child_path.push((bit, direction));
                    stack.push((internal.child(direction), child_path));
                }
            }
        }
    }

    assert_eq!(leaves, tree.size());
    assert_eq!(tree.iter().count(), tree.size());
    assert!(!tree.is_empty());
}

/// Renders the tree structure, for comparing the shapes of two trees.
pub fn shape_of<K: std::fmt::Debug, V: std::fmt::Debug, A, F: NodeFactory<K, V>>(
    tree: &CritBitTree<K, V, A, F>,
) -> String {
    format!("{:?}", tree.root())
}
