//! Shift schedule for the 8-lane batch search.
//!
//! The batch engine reads the packed stream as consecutive 32-bit *units*
//! (see [`crate::window`]) and decodes elements in *groups* of [`LANES`].
//! Group `g` starts at stream bit `8·g·B` for bit width `B`. Each group is
//! decoded from a window of [`WINDOW_UNITS`] units (four backing words)
//! starting at the unit that contains the group's first bit.
//!
//! Because `8·B` is generally not a multiple of 32, the offset of the
//! group's first bit inside its window changes from group to group. It
//! returns to zero after `P = 32 / gcd(8·B, 32)` groups (`P ∈ {1, 2, 4}`),
//! at which point the window has advanced `P·B/4` units. Those `P` *phases*
//! are computed here once per bit width:
//!
//! - `window_unit`: first window unit, relative to the start of the cycle
//! - per lane, the window unit holding the low half of the field (`lo`), the
//!   unit holding its high half (`hi`, equal to `lo` when the field fits in
//!   one unit) and the right shift that moves the field to bit 0 of the
//!   64-bit pair `hi:lo`
//!
//! A width is schedulable when every lane of every phase fits inside the
//! window, which holds for `1..=30` and `32`. For `B = 17` the schedule has
//! four phases with windows at units `0, 4, 8, 12` and advances 17 units per
//! cycle.

use crate::PackedError;
use crate::bit_ops::low_mask;

/// Elements decoded per group.
pub const LANES: usize = 8;
/// Width of one window unit.
pub const UNIT_BITS: u32 = 32;
/// Units loaded per window (four 64-bit words).
pub const WINDOW_UNITS: usize = 8;
/// Upper bound on the schedule period.
pub const MAX_PHASES: usize = 4;

/// Decode plan for one group position within a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phase {
    pub window_unit: usize,
    pub lo: [u8; LANES],
    pub hi: [u8; LANES],
    pub shift: [u32; LANES],
}

impl Phase {
    /// Decodes lane `lane` from a loaded window.
    #[inline(always)]
    pub fn decode(&self, window: &[u32; WINDOW_UNITS], lane: usize, mask: u64) -> u64 {
        let pair = (u64::from(window[self.hi[lane] as usize]) << UNIT_BITS)
            | u64::from(window[self.lo[lane] as usize]);
        (pair >> self.shift[lane]) & mask
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSchedule {
    bit_width: u32,
    mask: u64,
    period: usize,
    cycle_units: usize,
    phases: [Phase; MAX_PHASES],
}

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl ShiftSchedule {
    /// Builds the schedule for `bit_width`.
    ///
    /// # Errors
    ///
    /// `PackedError::UnsupportedWidth` if some field of some phase cannot be
    /// decoded from a single window.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_column::schedule::ShiftSchedule;
    ///
    /// let s = ShiftSchedule::new(17).unwrap();
    /// assert_eq!(s.period(), 4);
    /// assert_eq!(s.cycle_units(), 17);
    /// assert_eq!(s.phases()[1].window_unit, 4);
    /// assert_eq!(s.phases()[1].shift[0], 8);
    ///
    /// assert!(ShiftSchedule::new(31).is_err());
    /// ```
    pub fn new(bit_width: u32) -> Result<Self, PackedError> {
        if bit_width == 0 || bit_width > UNIT_BITS {
            return Err(PackedError::UnsupportedWidth(bit_width));
        }
        let unit = UNIT_BITS as usize;
        let width = bit_width as usize;
        let group_bits = LANES * width;
        let period = unit / gcd(group_bits, unit);
        let cycle_units = period * group_bits / unit;

        let mut phases = [Phase::default(); MAX_PHASES];
        for (p, phase) in phases.iter_mut().enumerate().take(period) {
            let start = p * group_bits;
            phase.window_unit = start / unit;
            let base = start % unit;

            for lane in 0..LANES {
                let bit = base + lane * width;
                let lo = bit / unit;
                let shift = (bit % unit) as u32;
                let hi = if shift + bit_width <= UNIT_BITS {
                    lo
                } else {
                    lo + 1
                };
                if hi >= WINDOW_UNITS {
                    return Err(PackedError::UnsupportedWidth(bit_width));
                }
                phase.lo[lane] = lo as u8;
                phase.hi[lane] = hi as u8;
                phase.shift[lane] = shift;
            }
        }

        Ok(Self {
            bit_width,
            mask: low_mask(bit_width),
            period,
            cycle_units,
            phases,
        })
    }

    /// `true` if [`ShiftSchedule::new`] succeeds for `bit_width`.
    pub fn supports(bit_width: u32) -> bool {
        Self::new(bit_width).is_ok()
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Mask applied to every decoded lane.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Number of groups before the window alignment repeats.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Units the window advances over one full period.
    pub fn cycle_units(&self) -> usize {
        self.cycle_units
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases[..self.period]
    }

    /// First window unit of group `group`.
    #[inline]
    pub fn window_start(&self, group: usize) -> usize {
        (group / self.period) * self.cycle_units + self.phases[group % self.period].window_unit
    }
}
