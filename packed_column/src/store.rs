//! Fixed-width packed vector.
//!
//! # Examples
//!
//! ## Declared size
//!
//! ```rust
//! use packed_column::{PackedError, PackedVec};
//!
//! let mut store = PackedVec::new(17, 2).unwrap();
//! store.push(0xFFFF_FFFF).unwrap(); // truncated to 17 bits
//! store.push(5).unwrap();
//!
//! assert_eq!(store.get(0), Some(0x1FFFF));
//! assert_eq!(store.get(1), Some(5));
//! assert_eq!(store.push(6), Err(PackedError::OutOfCapacity { capacity: 2 }));
//! ```
//!
//! ## Growable
//!
//! ```rust
//! use packed_column::PackedVec;
//!
//! let mut store = PackedVec::growable(9).unwrap();
//! for i in 0..20 {
//!     store.push(i).unwrap();
//! }
//! assert_eq!(store.declared_size(), 20);
//! assert_eq!(store.iter().sum::<u64>(), 190);
//! ```

use core::fmt;

use log::{debug, trace};
use raw_words::Container;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::PackedError;
use crate::bit_ops::{self, WORD_BITS, low_mask};
use crate::index::{BitPos, words_for};
use crate::schedule::ShiftSchedule;
use crate::search::{self, SearchStrategy};

type Result<T> = core::result::Result<T, PackedError>;

/// What `push` does once the declared size is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Growth {
    /// Appending past the declared size fails with `OutOfCapacity`.
    #[default]
    Fixed,
    /// Storage grows and the declared size follows the element count.
    Grow,
}

/// `len` unsigned integers of `bit_width` bits each, packed into `u64` words.
///
/// Element `i` occupies stream bits `[i·bit_width, (i+1)·bit_width)`, where
/// word `k` holds stream bits `[64·k, 64·k + 64)`.
#[derive(Debug, Clone)]
pub struct PackedVec {
    bit_width: u32,
    mask: u64,
    len: usize,
    declared: usize,
    growth: Growth,
    words: Container<u64>,
    schedule: Option<ShiftSchedule>,
}

/// Validates the bit width.
#[inline(always)]
fn validate_width(bit_width: u32) -> Result<()> {
    if (1..=WORD_BITS).contains(&bit_width) {
        Ok(())
    } else {
        Err(PackedError::InvalidBitWidth(bit_width))
    }
}

impl PackedVec {
    /// Creates a store sized for exactly `declared_size` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_column::PackedVec;
    ///
    /// let store = PackedVec::new(17, 13).unwrap();
    /// assert_eq!(store.words().len(), 4);
    /// assert!(store.is_empty());
    /// assert!(store.schedule().is_some());
    ///
    /// assert!(PackedVec::new(0, 10).is_err());
    /// assert!(PackedVec::new(65, 10).is_err());
    /// ```
    pub fn new(bit_width: u32, declared_size: usize) -> Result<Self> {
        Self::with_growth(bit_width, declared_size, Growth::Fixed)
    }

    /// Creates an empty store that grows on every append.
    pub fn growable(bit_width: u32) -> Result<Self> {
        Self::with_growth(bit_width, 0, Growth::Grow)
    }

    pub fn with_growth(bit_width: u32, declared_size: usize, growth: Growth) -> Result<Self> {
        validate_width(bit_width)?;
        let word_count = words_for(declared_size, bit_width).ok_or(PackedError::OutOfCapacity {
            capacity: declared_size,
        })?;
        let words = Container::zeroed(word_count)?;

        let schedule = match ShiftSchedule::new(bit_width) {
            Ok(schedule) => Some(schedule),
            Err(_) => {
                debug!("bit width {} has no batch schedule; batch search disabled", bit_width);
                None
            }
        };
        debug!(
            "packed store: width {} declared {} words {} growth {:?}",
            bit_width, declared_size, word_count, growth
        );

        Ok(Self {
            bit_width,
            mask: low_mask(bit_width),
            len: 0,
            declared: declared_size,
            growth,
            words,
            schedule,
        })
    }

    /// Builds a store holding `values`, declared size `values.len()`.
    pub fn from_values(bit_width: u32, values: &[u64]) -> Result<Self> {
        let mut store = Self::new(bit_width, values.len())?;
        store.extend_from_slice(values)?;
        Ok(store)
    }

    /// Appends the low `bit_width` bits of `value`.
    ///
    /// # Errors
    ///
    /// `OutOfCapacity` if the store is full and fixed-size, or if growing the
    /// backing words fails.
    pub fn push(&mut self, value: u64) -> Result<()> {
        if self.len == self.declared {
            match self.growth {
                Growth::Fixed => {
                    return Err(PackedError::OutOfCapacity {
                        capacity: self.declared,
                    });
                }
                Growth::Grow => self.grow_to(self.len + 1)?,
            }
        }

        let pos = BitPos::of_element(self.len, self.bit_width);
        bit_ops::or_bits(
            self.words.as_mut_slice(),
            pos,
            self.bit_width,
            value & self.mask,
        );
        self.len += 1;
        Ok(())
    }

    pub fn extend_from_slice(&mut self, values: &[u64]) -> Result<()> {
        for &value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// Makes room for `count` elements and declares them.
    fn grow_to(&mut self, count: usize) -> Result<()> {
        let full = PackedError::OutOfCapacity {
            capacity: self.declared,
        };
        let required = words_for(count, self.bit_width).ok_or(full.clone())?;
        if required > self.words.len() {
            trace!(
                "packed store growing from {} to {} words",
                self.words.len(),
                required
            );
            self.words.grow_zeroed(required).map_err(|_| full)?;
        }
        self.declared = count;
        Ok(())
    }

    /// Value at `pos`, or `None` if `pos >= len()`.
    #[inline]
    pub fn get(&self, pos: usize) -> Option<u64> {
        if pos >= self.len {
            return None;
        }
        let at = BitPos::of_element(pos, self.bit_width);
        Some(bit_ops::extract_bits(
            self.words.as_slice(),
            at,
            self.bit_width,
        ))
    }

    /// Value at `pos`, or `IndexOutOfBounds`.
    pub fn try_get(&self, pos: usize) -> Result<u64> {
        self.get(pos)
            .ok_or(PackedError::IndexOutOfBounds(pos, self.len))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Largest storable value.
    pub fn max_value(&self) -> u64 {
        self.mask
    }

    /// Number of slots every search result covers.
    pub fn declared_size(&self) -> usize {
        self.declared
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Elements the current words can hold without growing.
    pub fn capacity(&self) -> usize {
        (self.words.len() * WORD_BITS as usize) / self.bit_width as usize
    }

    /// Backing words, word `k` holding stream bits `[64·k, 64·k + 64)`.
    pub fn words(&self) -> &[u64] {
        self.words.as_slice()
    }

    /// Batch search schedule for this width, if one exists.
    pub fn schedule(&self) -> Option<&ShiftSchedule> {
        self.schedule.as_ref()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            index: 0,
        }
    }

    /// See [`search::scalar_search`].
    pub fn scalar_search(&self, value: u64) -> Vec<bool> {
        search::scalar_search(self, value)
    }

    /// See [`search::batch_search`].
    pub fn batch_search(&self, value: u64) -> Result<Vec<bool>> {
        search::batch_search(self, value)
    }

    /// See [`search::batch_search_with`].
    pub fn batch_search_with(&self, value: u64, strategy: SearchStrategy) -> Result<Vec<bool>> {
        search::batch_search_with(self, value, strategy)
    }

    /// Number of elements equal to `value`.
    ///
    /// Uses the batch engine when the width is schedulable.
    ///
    /// ```
    /// use packed_column::PackedVec;
    ///
    /// let store = PackedVec::from_values(5, &[3, 1, 3, 3, 0]).unwrap();
    /// assert_eq!(store.count_matches(3), 3);
    /// ```
    pub fn count_matches(&self, value: u64) -> usize {
        let found = match self.batch_search(value) {
            Ok(found) => found,
            Err(_) => self.scalar_search(value),
        };
        found.into_iter().filter(|&hit| hit).count()
    }
}

/// One 64-digit binary row per backing word, word 0 first.
impl fmt::Binary for PackedVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.words.iter() {
            writeln!(f, "{:064b}", word)?;
        }
        Ok(())
    }
}

pub struct Iter<'a> {
    store: &'a PackedVec,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let val = self.store.get(self.index)?;
        self.index += 1;
        Some(val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.store.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PackedVec {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_in_memory() -> Result<()> {
        let mut pb = PackedVec::new(12, 3)?;
        pb.push(0xABC)?;
        pb.push(0x123)?;
        pb.push(0xFFF)?;
        assert_eq!(pb.len(), 3);
        assert_eq!(pb.get(0), Some(0xABC));
        assert_eq!(pb.get(1), Some(0x123));
        assert_eq!(pb.get(2), Some(0xFFF));

        let collected: Vec<_> = pb.iter().collect();
        assert_eq!(collected, vec![0xABC, 0x123, 0xFFF]);
        Ok(())
    }

    #[test]
    fn sequential_17_bit_values() -> Result<()> {
        let mut pb = PackedVec::new(17, 20)?;
        for i in 0..20 {
            pb.push(i)?;
        }
        for i in 0..20 {
            assert_eq!(pb.get(i as usize), Some(i));
        }
        let expected: Vec<bool> = (0..20).map(|i| i == 7).collect();
        assert_eq!(pb.scalar_search(7), expected);
        assert_eq!(pb.batch_search(7)?, expected);
        Ok(())
    }

    #[test]
    fn high_bits_are_truncated() -> Result<()> {
        let mut pb = PackedVec::new(17, 2)?;
        pb.push(0xFFFF_FFFF)?;
        pb.push(5)?;
        assert_eq!(pb.get(0), Some(0x1FFFF));
        assert_eq!(pb.get(1), Some(5));
        Ok(())
    }

    #[test]
    fn full_width_words() -> Result<()> {
        let mut pb = PackedVec::new(64, 2)?;
        pb.push(u64::MAX)?;
        pb.push(12345)?;
        assert_eq!(pb.get(0), Some(u64::MAX));
        assert_eq!(pb.get(1), Some(12345));
        assert_eq!(pb.words(), &[u64::MAX, 12345]);
        Ok(())
    }

    #[test]
    fn fixed_store_rejects_overflow() -> Result<()> {
        let mut pb = PackedVec::new(5, 2)?;
        pb.push(1)?;
        pb.push(2)?;
        assert_eq!(pb.push(3), Err(PackedError::OutOfCapacity { capacity: 2 }));
        assert_eq!(pb.len(), 2);
        Ok(())
    }

    #[test]
    fn out_of_range_reads() -> Result<()> {
        let mut pb = PackedVec::new(9, 10)?;
        pb.push(7)?;
        assert_eq!(pb.get(1), None);
        assert_eq!(pb.try_get(1), Err(PackedError::IndexOutOfBounds(1, 1)));
        assert_eq!(pb.try_get(10), Err(PackedError::IndexOutOfBounds(10, 1)));
        assert_eq!(pb.try_get(0), Ok(7));
        Ok(())
    }

    #[test]
    fn growable_store() -> Result<()> {
        let mut pb = PackedVec::growable(9)?;
        assert_eq!(pb.declared_size(), 0);
        assert!(pb.words().is_empty());
        for i in 0..100 {
            pb.push(i)?;
        }
        assert_eq!(pb.len(), 100);
        assert_eq!(pb.declared_size(), 100);
        assert_eq!(pb.words().len(), 15);
        assert!(pb.iter().eq(0..100));
        assert_eq!(pb.batch_search(99)?.len(), 100);
        Ok(())
    }

    #[test]
    fn with_capacity_presizes_words() -> Result<()> {
        let pb = PackedVec::new(8, 100)?;
        assert!(pb.capacity() >= 100);
        assert_eq!(pb.words().len(), 13);
        assert_eq!(pb.len(), 0);
        Ok(())
    }

    #[test]
    fn invalid_widths() {
        assert_eq!(
            PackedVec::new(0, 4).unwrap_err(),
            PackedError::InvalidBitWidth(0)
        );
        assert_eq!(
            PackedVec::growable(65).unwrap_err(),
            PackedError::InvalidBitWidth(65)
        );
    }

    #[test]
    fn empty_and_single_element() -> Result<()> {
        let empty = PackedVec::new(17, 0)?;
        assert!(empty.words().is_empty());
        assert!(empty.scalar_search(0).is_empty());
        assert!(empty.batch_search(0)?.is_empty());

        let single = PackedVec::from_values(17, &[42])?;
        assert_eq!(single.scalar_search(42), vec![true]);
        assert_eq!(single.batch_search(42)?, vec![true]);
        Ok(())
    }

    #[test]
    fn binary_dump() -> Result<()> {
        let pb = PackedVec::from_values(4, &[0x1, 0xF])?;
        let dump = format!("{:b}", pb);
        let expected = format!("{:064b}\n", 0xF1u64);
        assert_eq!(dump, expected);
        Ok(())
    }

    #[test]
    fn unscheduled_width_falls_back_for_counts() -> Result<()> {
        let pb = PackedVec::from_values(40, &[1 << 39, 3, 1 << 39])?;
        assert!(pb.schedule().is_none());
        assert_eq!(pb.count_matches(1 << 39), 2);
        Ok(())
    }
}
