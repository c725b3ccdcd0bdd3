//! Bit-level key inspection.
//!
//! A crit-bit tree never orders keys with a comparator. Everything it needs to know
//! about a key comes from a [`KeyAnalyzer`]: where two keys first differ, and whether a
//! given bit of a key is set. Bit `0` is the most significant bit; a clear bit routes
//! left and a set bit routes right, so in-order traversal yields keys in ascending bit
//! order.

pub mod byte_analyzer;
pub mod int_analyzer;

pub use byte_analyzer::ByteAnalyzer;
pub use int_analyzer::IntAnalyzer;

/// Pluggable bit-level comparison for a key type.
///
/// Implementations must be pure: repeated calls with the same keys give the same
/// answers, and the two methods agree with each other. If
/// `differing_bit(a, b) == Some(i)` then `is_bit_set(a, i) != is_bit_set(b, i)`, and
/// every bit before `i` is equal in both keys. An analyzer that breaks this contract
/// does not cause memory unsafety, but the tree will silently lose or misplace
/// entries.
pub trait KeyAnalyzer<K: ?Sized> {
    /// Returns the index of the most significant bit at which `a` and `b` differ, or
    /// `None` if the keys are identical bit for bit.
    fn differing_bit(&self, a: &K, b: &K) -> Option<usize>;

    /// Returns true if bit `bit` of `key` is 1.
    ///
    /// Bits past the end of the key read as 0, for fixed-width and variable-length
    /// keys alike.
    fn is_bit_set(&self, key: &K, bit: usize) -> bool;
}

/// Analyzers whose keys have a meaningful bit length, so that one key can be a prefix
/// of another.
pub trait PrefixAnalyzer<K: ?Sized>: KeyAnalyzer<K> {
    /// Number of significant bits in `key`.
    fn bit_length(&self, key: &K) -> usize;

    /// Returns true if the first `bit_length(prefix)` bits of `key` equal `prefix`.
    fn is_prefix(&self, prefix: &K, key: &K) -> bool;
}
