use std::marker::PhantomData;

use num_traits::PrimInt;

use crate::keys::KeyAnalyzer;

/// Analyzer for fixed-width primitive integers.
///
/// Bit `0` is the most significant bit. For signed types the sign bit is flipped before
/// testing, so that bit order (and therefore tree order) matches numeric order:
/// negative numbers sort before zero and positive numbers.
///
/// ```rust
/// use critbit::keys::{IntAnalyzer, KeyAnalyzer};
///
/// let analyzer = IntAnalyzer::<u8>::new();
/// assert_eq!(analyzer.differing_bit(&0b1000_0000, &0b1000_0001), Some(7));
/// assert!(analyzer.is_bit_set(&0b1000_0000, 0));
/// ```
pub struct IntAnalyzer<T> {
    _phantom: PhantomData<fn(T)>,
}

impl<T> IntAnalyzer<T> {
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for IntAnalyzer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for IntAnalyzer<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IntAnalyzer<T> {}

impl<T> std::fmt::Debug for IntAnalyzer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IntAnalyzer<{}>", std::any::type_name::<T>())
    }
}

impl<T: PrimInt> IntAnalyzer<T> {
    #[inline]
    fn width() -> usize {
        T::zero().count_zeros() as usize
    }

    /// `min_value()` is the lone sign bit for signed types and zero for unsigned ones.
    #[inline]
    fn ordered(key: T) -> T {
        key ^ T::min_value()
    }
}

impl<T: PrimInt> KeyAnalyzer<T> for IntAnalyzer<T> {
    #[inline]
    fn differing_bit(&self, a: &T, b: &T) -> Option<usize> {
        // The sign flip cancels out under xor.
        let diff = *a ^ *b;
        if diff.is_zero() {
            None
        } else {
            Some(diff.leading_zeros() as usize)
        }
    }

    #[inline]
    fn is_bit_set(&self, key: &T, bit: usize) -> bool {
        let Some(shift) = Self::width().checked_sub(bit).and_then(|n| n.checked_sub(1)) else {
            return false;
        };
        let shift = shift as u32;
        (Self::ordered(*key).unsigned_shr(shift) & T::one()) == T::one()
    }
}
