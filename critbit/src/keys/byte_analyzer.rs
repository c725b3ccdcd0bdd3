use crate::keys::{KeyAnalyzer, PrefixAnalyzer};

/// Analyzer for anything that can be viewed as a byte string.
///
/// Bits are numbered big-endian: bit `i` is bit `7 - i % 8` of byte `i / 8`. Bits
/// beyond the end of a key read as zero, which makes the tree order keys
/// lexicographically by bytes, with shorter keys first.
///
/// Because of that zero padding, two keys that differ only by trailing NUL bytes
/// (`b"a"` and `b"a\0"`) are the same key to the tree, the same way NUL-terminated
/// crit-bit trees treat them.
///
/// ## Examples
///
/// ```rust
/// use critbit::keys::{ByteAnalyzer, KeyAnalyzer};
///
/// // 'a' = 0110_0001, 'b' = 0110_0010
/// assert_eq!(ByteAnalyzer.differing_bit("a", "b"), Some(6));
/// assert_eq!(ByteAnalyzer.differing_bit("a", "a"), None);
/// assert!(ByteAnalyzer.is_bit_set("b", 6));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByteAnalyzer;

#[inline]
fn byte_at(bytes: &[u8], pos: usize) -> u8 {
    bytes.get(pos).copied().unwrap_or(0)
}

#[inline]
fn mask_for(bit: usize) -> u8 {
    0x80 >> (bit % 8)
}

impl<K: AsRef<[u8]> + ?Sized> KeyAnalyzer<K> for ByteAnalyzer {
    fn differing_bit(&self, a: &K, b: &K) -> Option<usize> {
        let (a, b) = (a.as_ref(), b.as_ref());
        let common = a.len().min(b.len());

        if let Some(pos) = a[..common]
            .iter()
            .zip(&b[..common])
            .position(|(x, y)| x != y)
        {
            let diff = a[pos] ^ b[pos];
            return Some(pos * 8 + diff.leading_zeros() as usize);
        }

        // The common part is equal; the longer key differs at its first non-zero
        // byte past the end of the shorter one.
        let longer = if a.len() > b.len() { a } else { b };
        longer[common..]
            .iter()
            .position(|&byte| byte != 0)
            .map(|offset| {
                let pos = common + offset;
                pos * 8 + longer[pos].leading_zeros() as usize
            })
    }

    #[inline]
    fn is_bit_set(&self, key: &K, bit: usize) -> bool {
        byte_at(key.as_ref(), bit / 8) & mask_for(bit) != 0
    }
}

impl<K: AsRef<[u8]> + ?Sized> PrefixAnalyzer<K> for ByteAnalyzer {
    #[inline]
    fn bit_length(&self, key: &K) -> usize {
        key.as_ref().len() * 8
    }

    fn is_prefix(&self, prefix: &K, key: &K) -> bool {
        let (prefix, key) = (prefix.as_ref(), key.as_ref());
        prefix
            .iter()
            .enumerate()
            .all(|(pos, &byte)| byte_at(key, pos) == byte)
    }
}
