//! Digit sets for candidate bookkeeping.

use serde::{Deserialize, Serialize};

/// A set of Sudoku digits (1-9), stored as a bitmask where bit `d` means digit `d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BitSet(u16);

/// Mask with bits 1..=9 set.
const ALL_DIGITS: u16 = 0b11_1111_1110;

impl BitSet {
    /// The empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All nine digits
    pub const fn all() -> Self {
        Self(ALL_DIGITS)
    }

    /// A set holding one digit
    pub fn single(digit: u8) -> Self {
        debug_assert!((1..=9).contains(&digit));
        Self(1 << digit)
    }

    /// Build from raw bits; bits outside 1..=9 are dropped.
    pub const fn from_raw(bits: u16) -> Self {
        Self(bits & ALL_DIGITS)
    }

    /// Build from a slice of digits
    pub fn from_slice(digits: &[u8]) -> Self {
        digits.iter().fold(Self::empty(), |acc, &d| acc.with(d))
    }

    /// Raw bits
    pub const fn raw(&self) -> u16 {
        self.0
    }

    #[inline]
    pub fn contains(&self, digit: u8) -> bool {
        (1..=9).contains(&digit) && self.0 & (1 << digit) != 0
    }

    pub fn insert(&mut self, digit: u8) {
        if (1..=9).contains(&digit) {
            self.0 |= 1 << digit;
        }
    }

    pub fn remove(&mut self, digit: u8) {
        if (1..=9).contains(&digit) {
            self.0 &= !(1 << digit);
        }
    }

    /// Copy of this set with `digit` added
    pub fn with(mut self, digit: u8) -> Self {
        self.insert(digit);
        self
    }

    /// Copy of this set with `digit` removed
    pub fn without(mut self, digit: u8) -> Self {
        self.remove(digit);
        self
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&self, other: &BitSet) -> BitSet {
        Self(self.0 | other.0)
    }

    pub fn intersection(&self, other: &BitSet) -> BitSet {
        Self(self.0 & other.0)
    }

    pub fn difference(&self, other: &BitSet) -> BitSet {
        Self(self.0 & !other.0)
    }

    /// Smallest digit in the set
    pub fn first(&self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Iterate digits in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;
        (1..=9u8).filter(move |&d| bits & (1 << d) != 0)
    }
}

impl FromIterator<u8> for BitSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, d| acc.with(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let mut set = BitSet::from_slice(&[3, 7]);
        assert_eq!(set.count(), 2);
        assert!(set.contains(3));
        assert!(!set.contains(4));
        set.remove(3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(set.first(), Some(7));
    }

    #[test]
    fn test_out_of_range_digits_ignored() {
        let mut set = BitSet::empty();
        set.insert(0);
        set.insert(10);
        assert!(set.is_empty());
        assert_eq!(BitSet::from_raw(0xFFFF), BitSet::all());
    }
}
