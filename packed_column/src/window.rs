//! Fixed-layout view of the packed words as 32-bit units.
//!
//! Unit `u` is stream bits `[32·u, 32·u + 32)`: the low half of word `u / 2`
//! when `u` is even, its high half when `u` is odd. This follows from the
//! stream being little-endian across words and does not depend on host byte
//! order. On little-endian hosts the unit sequence is exactly the word buffer
//! cast to `u32` with `bytemuck`; elsewhere units are split out with shifts.

use crate::schedule::{UNIT_BITS, WINDOW_UNITS};

/// Unit `unit` of the stream, or zero past the end of `words`.
#[inline(always)]
pub fn unit_at(words: &[u64], unit: usize) -> u32 {
    match words.get(unit / 2) {
        Some(&w) => (w >> ((unit % 2) as u32 * UNIT_BITS)) as u32,
        None => 0,
    }
}

/// Loads the window of [`WINDOW_UNITS`] units starting at `unit`.
///
/// Units past the end of `words` read as zero, so the final window of a
/// store may overhang its buffer.
#[inline(always)]
pub fn load_window(words: &[u64], unit: usize) -> [u32; WINDOW_UNITS] {
    let mut window = [0u32; WINDOW_UNITS];

    #[cfg(target_endian = "little")]
    {
        let units: &[u32] = bytemuck::cast_slice(words);
        if let Some(src) = units.get(unit..unit + WINDOW_UNITS) {
            window.copy_from_slice(src);
            return window;
        }
    }

    for (i, slot) in window.iter_mut().enumerate() {
        *slot = unit_at(words, unit + i);
    }
    window
}
