//! Crit-bit (PATRICIA) trees.
//!
//! A crit-bit tree is a binary trie in which every internal node records the index of
//! the first bit at which the keys in its two subtrees differ. Chains of one-child
//! nodes never exist, so a tree holding `n` entries has exactly `n - 1` internal
//! nodes, and lookups compare one whole key at most.
//!
//! Two variants share the same algorithms:
//!
//! - [`MutableCritBitTree`] owns its nodes and updates them in place.
//! - [`PersistentCritBitTree`] shares nodes between versions. Taking a snapshot is O(1)
//!   and later updates copy only the path to the updated entry.
//!
//! Keys are inspected bit by bit through a [`KeyAnalyzer`]. [`ByteAnalyzer`] covers
//! byte strings, [`IntAnalyzer`] covers primitive integers in numeric order.
//!
//! ```rust
//! use critbit::{IntAnalyzer, PersistentCritBitTree};
//!
//! let mut tree = PersistentCritBitTree::new(IntAnalyzer::<i32>::new());
//! tree.put(-4, "minus four");
//! tree.put(9, "nine");
//!
//! let before = tree.snapshot();
//! tree.put(0, "zero");
//!
//! assert_eq!(before.size(), 2);
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [-4, 0, 9]);
//! ```

pub mod context;
pub mod factory;
pub mod iter;
pub mod keys;
pub mod node;
pub mod search;
pub mod stats;
pub mod tree;

pub use context::Context;
pub use factory::{MutableNodeFactory, NodeFactory, PersistentNodeFactory};
pub use keys::{ByteAnalyzer, IntAnalyzer, KeyAnalyzer, PrefixAnalyzer};
pub use node::{Direction, Internal, Leaf, NodeRef, Shape};
pub use search::SearchResult;
pub use stats::{TreeStats, TreeStatsTrait};
pub use tree::{CritBitTree, MutableCritBitTree, PersistentCritBitTree};
