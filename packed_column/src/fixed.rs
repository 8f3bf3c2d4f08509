//! Packed vector with the bit width fixed at compile time.
//!
//! # Examples
//!
//! ```rust
//! use packed_column::FixedWidth;
//!
//! let mut ids = FixedWidth::<17>::new(20).expect("Failed to create store");
//! for i in 0..20 {
//!     ids.push(i).unwrap();
//! }
//!
//! assert_eq!(ids.get(7), Some(7));
//! let hits = ids.batch_search(7).unwrap();
//! assert_eq!(hits.iter().position(|&hit| hit), Some(7));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::{PackedError, PackedVec};

type Result<T> = core::result::Result<T, PackedError>;

#[derive(Debug, Clone)]
pub struct FixedWidth<const N: u32> {
    bits: PackedVec,
}

impl<const N: u32> FixedWidth<N> {
    /// Largest value that survives a push unchanged.
    pub const MAX: u64 = if N >= u64::BITS { u64::MAX } else { (1u64 << N) - 1 };

    pub fn new(declared_size: usize) -> Result<Self> {
        Ok(Self {
            bits: PackedVec::new(N, declared_size)?,
        })
    }

    pub fn growable() -> Result<Self> {
        Ok(Self {
            bits: PackedVec::growable(N)?,
        })
    }

    pub fn push(&mut self, value: u64) -> Result<()> {
        self.bits.push(value)
    }

    pub fn get(&self, pos: usize) -> Option<u64> {
        self.bits.get(pos)
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn scalar_search(&self, value: u64) -> Vec<bool> {
        self.bits.scalar_search(value)
    }

    pub fn batch_search(&self, value: u64) -> Result<Vec<bool>> {
        self.bits.batch_search(value)
    }

    /// The underlying runtime-width store.
    pub fn as_packed(&self) -> &PackedVec {
        &self.bits
    }

    pub fn into_packed(self) -> PackedVec {
        self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_carried_by_the_type() -> Result<()> {
        let mut v = FixedWidth::<3>::new(4)?;
        v.push(9)?;
        assert_eq!(v.get(0), Some(1));
        assert_eq!(v.as_packed().bit_width(), 3);
        assert_eq!(FixedWidth::<3>::MAX, 7);
        assert_eq!(FixedWidth::<64>::MAX, u64::MAX);
        Ok(())
    }

    #[test]
    fn invalid_width_fails_at_construction() {
        assert!(matches!(
            FixedWidth::<0>::new(1),
            Err(PackedError::InvalidBitWidth(0))
        ));
        assert!(matches!(
            FixedWidth::<70>::growable(),
            Err(PackedError::InvalidBitWidth(70))
        ));
    }

    #[test]
    fn growable_fixed_width() -> Result<()> {
        let mut v = FixedWidth::<12>::growable()?;
        for i in 0..50 {
            v.push(i)?;
        }
        assert_eq!(v.len(), 50);
        assert!(v.scalar_search(49)[49]);
        assert_eq!(v.into_packed().declared_size(), 50);
        Ok(())
    }
}
