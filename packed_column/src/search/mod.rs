//! Equality search over a [`PackedVec`].
//!
//! [`scalar_search`] decodes every element through [`PackedVec::get`] and is
//! the reference result. [`batch_search`] decodes eight elements per step from
//! a four-word window using the store's [`ShiftSchedule`]; the kernel doing
//! the per-group work is picked once per call:
//!
//! | kernel       | lanes                                              |
//! |--------------|----------------------------------------------------|
//! | `Portable`   | eight scalar shift/mask/compare steps              |
//! | `Avx2Wide64` | two 4×64-bit vectors compared to the query directly|
//! | `Avx2Split32`| two 4×64-bit vectors folded to 8×32 by `hadd`      |
//!
//! All kernels produce identical results.

use log::trace;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::schedule::{LANES, ShiftSchedule, WINDOW_UNITS};
use crate::window::load_window;
use crate::{PackedError, PackedVec};

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
mod avx2;
mod portable;

/// Requested lane strategy for [`batch_search_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Best kernel the CPU supports.
    #[default]
    Auto,
    /// Plain 8-lane loop, available everywhere.
    Portable,
    /// 64-bit lanes compared directly against the query.
    Wide64,
    /// 64-bit lanes merged into 32-bit lanes before comparing.
    Split32,
}

/// Kernel actually used for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Portable,
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    Avx2Wide64,
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    Avx2Split32,
}

impl Kernel {
    /// Resolves a strategy against the running CPU.
    ///
    /// SIMD strategies the CPU (or build) cannot run resolve to `Portable`.
    pub fn resolve(strategy: SearchStrategy) -> Kernel {
        let kernel = match strategy {
            SearchStrategy::Portable => Kernel::Portable,
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            SearchStrategy::Auto | SearchStrategy::Wide64 if avx2_available() => {
                Kernel::Avx2Wide64
            }
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            SearchStrategy::Split32 if avx2_available() => Kernel::Avx2Split32,
            _ => Kernel::Portable,
        };
        trace!("search strategy {:?} resolved to kernel {:?}", strategy, kernel);
        kernel
    }
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
fn avx2_available() -> bool {
    #[cfg(feature = "std")]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "avx2")
    }
}

/// Positions equal to `value`, decoded one element at a time.
///
/// The result has `store.declared_size()` slots; slots at or beyond
/// `store.len()` are `false`.
pub fn scalar_search(store: &PackedVec, value: u64) -> Vec<bool> {
    let mut found = vec![false; store.declared_size()];
    for (slot, stored) in found.iter_mut().zip(store.iter()) {
        *slot = stored == value;
    }
    found
}

/// Positions equal to `value`, decoded eight at a time with the best kernel.
///
/// # Errors
///
/// `PackedError::UnsupportedWidth` if the store's bit width has no shift
/// schedule; fall back to [`scalar_search`] in that case.
pub fn batch_search(store: &PackedVec, value: u64) -> Result<Vec<bool>, PackedError> {
    batch_search_with(store, value, SearchStrategy::Auto)
}

/// [`batch_search`] with an explicit lane strategy.
pub fn batch_search_with(
    store: &PackedVec,
    value: u64,
    strategy: SearchStrategy,
) -> Result<Vec<bool>, PackedError> {
    let schedule = store
        .schedule()
        .ok_or(PackedError::UnsupportedWidth(store.bit_width()))?;

    let mut found = Vec::new();
    found.try_reserve_exact(store.declared_size()).map_err(|_| {
        raw_words::ContainerError::AllocationFailed {
            requested: store.declared_size(),
        }
    })?;

    // a query wider than the field can never match
    if value <= schedule.mask() {
        let words = store.words();
        let len = store.len();
        match Kernel::resolve(strategy) {
            Kernel::Portable => portable::scan(words, len, schedule, value, &mut found),
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            // SAFETY: `resolve` only returns AVX2 kernels after detecting AVX2
            Kernel::Avx2Wide64 => unsafe { avx2::scan_wide64(words, len, schedule, value, &mut found) },
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            // SAFETY: as above
            Kernel::Avx2Split32 => unsafe { avx2::scan_split32(words, len, schedule, value, &mut found) },
        }
    }

    found.resize(store.declared_size(), false);
    Ok(found)
}

/// Walks the groups covering the first `len` elements.
///
/// `group_hits` receives the group's window and phase index and returns one
/// bit per lane, lane 0 in bit 0. Exactly `len` results are appended to
/// `found`; lanes of the last group past `len` are dropped.
#[inline(always)]
pub(crate) fn drive<F>(
    words: &[u64],
    len: usize,
    schedule: &ShiftSchedule,
    found: &mut Vec<bool>,
    mut group_hits: F,
) where
    F: FnMut(&[u32; WINDOW_UNITS], usize) -> u8,
{
    let phases = schedule.phases();
    let mut cycle_base = 0;
    let mut phase = 0;
    let mut start = 0;

    while start < len {
        let window = load_window(words, cycle_base + phases[phase].window_unit);
        let hits = group_hits(&window, phase);
        let take = (len - start).min(LANES);
        found.extend((0..take).map(|lane| (hits >> lane) & 1 == 1));

        start += LANES;
        phase += 1;
        if phase == phases.len() {
            phase = 0;
            cycle_base += schedule.cycle_units();
        }
    }
}
