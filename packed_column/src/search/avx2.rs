//! AVX2 kernels.
//!
//! A group's window is loaded into one 256-bit register as eight 32-bit
//! units. Two `vpermd` shuffles gather the `lo`/`hi` units of each lane into
//! 64-bit pairs: the *first* vector carries lanes 0, 1, 4, 5 and the
//! *second* lanes 2, 3, 6, 7. Each 64-bit lane is shifted right by its own
//! amount (`vpsrlvq`) and masked to the field width.
//!
//! The lane split is chosen so that `_mm256_hadd_epi32(first, second)`,
//! which yields `[f0, f1, s0, s1, f2, f3, s2, s3]`, lists elements 0..8 in
//! order. `Split32` relies on that; `Wide64` compares the 64-bit lanes
//! directly and reorders the two 4-bit masks instead.

use core::arch::x86_64::*;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::drive;
use crate::schedule::{MAX_PHASES, Phase, ShiftSchedule};

const FIRST: [usize; 4] = [0, 1, 4, 5];
const SECOND: [usize; 4] = [2, 3, 6, 7];

/// Shuffle orders and shift counts of one phase, in register form.
#[derive(Clone, Copy)]
struct PhaseVectors {
    order_first: __m256i,
    order_second: __m256i,
    shift_first: __m256i,
    shift_second: __m256i,
}

fn unit_order(phase: &Phase, lanes: [usize; 4]) -> [i32; 8] {
    let mut order = [0i32; 8];
    for (i, &lane) in lanes.iter().enumerate() {
        order[2 * i] = i32::from(phase.lo[lane]);
        order[2 * i + 1] = i32::from(phase.hi[lane]);
    }
    order
}

fn shift_counts(phase: &Phase, lanes: [usize; 4]) -> [i64; 4] {
    lanes.map(|lane| i64::from(phase.shift[lane]))
}

#[target_feature(enable = "avx2")]
unsafe fn phase_vectors(phase: &Phase) -> PhaseVectors {
    let [a0, a1, a2, a3, a4, a5, a6, a7] = unit_order(phase, FIRST);
    let [b0, b1, b2, b3, b4, b5, b6, b7] = unit_order(phase, SECOND);
    let [s0, s1, s2, s3] = shift_counts(phase, FIRST);
    let [t0, t1, t2, t3] = shift_counts(phase, SECOND);
    PhaseVectors {
        order_first: _mm256_setr_epi32(a0, a1, a2, a3, a4, a5, a6, a7),
        order_second: _mm256_setr_epi32(b0, b1, b2, b3, b4, b5, b6, b7),
        shift_first: _mm256_setr_epi64x(s0, s1, s2, s3),
        shift_second: _mm256_setr_epi64x(t0, t1, t2, t3),
    }
}

#[target_feature(enable = "avx2")]
unsafe fn schedule_vectors(schedule: &ShiftSchedule) -> [PhaseVectors; MAX_PHASES] {
    let phases = schedule.phases();
    // unused slots repeat phase 0; the driver never selects them
    core::array::from_fn(|p| {
        let phase = phases.get(p).unwrap_or(&phases[0]);
        unsafe { phase_vectors(phase) }
    })
}

/// Gathers, shifts and masks four 64-bit lanes of a window.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn decode(window: __m256i, order: __m256i, shift: __m256i, mask: __m256i) -> __m256i {
    let pairs = _mm256_permutevar8x32_epi32(window, order);
    _mm256_and_si256(_mm256_srlv_epi64(pairs, shift), mask)
}

/// Compares 64-bit lanes against the query.
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(super) unsafe fn scan_wide64(
    words: &[u64],
    len: usize,
    schedule: &ShiftSchedule,
    value: u64,
    found: &mut Vec<bool>,
) {
    let vectors = unsafe { schedule_vectors(schedule) };
    let mask = _mm256_set1_epi64x(schedule.mask() as i64);
    let query = _mm256_set1_epi64x(value as i64);

    drive(words, len, schedule, found, |window, phase| unsafe {
        let v = &vectors[phase];
        let units = _mm256_loadu_si256(window.as_ptr().cast());
        let first = decode(units, v.order_first, v.shift_first, mask);
        let second = decode(units, v.order_second, v.shift_second, mask);

        let eq_first = _mm256_movemask_pd(_mm256_castsi256_pd(_mm256_cmpeq_epi64(first, query)));
        let eq_second =
            _mm256_movemask_pd(_mm256_castsi256_pd(_mm256_cmpeq_epi64(second, query)));
        spread(eq_first as u8, eq_second as u8)
    });
}

/// Folds the 64-bit lanes into eight 32-bit lanes and compares those.
///
/// # Safety
///
/// The CPU must support AVX2, and `value` must fit in 32 bits (true for
/// every schedulable width once wider queries are filtered out).
#[target_feature(enable = "avx2")]
pub(super) unsafe fn scan_split32(
    words: &[u64],
    len: usize,
    schedule: &ShiftSchedule,
    value: u64,
    found: &mut Vec<bool>,
) {
    debug_assert!(value <= u64::from(u32::MAX));
    let vectors = unsafe { schedule_vectors(schedule) };
    let mask = _mm256_set1_epi64x(schedule.mask() as i64);
    let query = _mm256_set1_epi32(value as u32 as i32);

    drive(words, len, schedule, found, |window, phase| unsafe {
        let v = &vectors[phase];
        let units = _mm256_loadu_si256(window.as_ptr().cast());
        let first = decode(units, v.order_first, v.shift_first, mask);
        let second = decode(units, v.order_second, v.shift_second, mask);

        // masked fields leave the high half of every 64-bit lane zero
        let merged = _mm256_hadd_epi32(first, second);
        let eq = _mm256_cmpeq_epi32(merged, query);
        _mm256_movemask_ps(_mm256_castsi256_ps(eq)) as u8
    });
}

/// Maps the per-vector 4-bit masks back to lane order.
#[inline(always)]
fn spread(first: u8, second: u8) -> u8 {
    (first & 0b0011)
        | ((first & 0b1100) << 2)
        | ((second & 0b0011) << 2)
        | ((second & 0b1100) << 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_restores_lane_order() {
        for (i, &lane) in FIRST.iter().enumerate() {
            assert_eq!(spread(1 << i, 0), 1 << lane);
        }
        for (i, &lane) in SECOND.iter().enumerate() {
            assert_eq!(spread(0, 1 << i), 1 << lane);
        }
    }

    #[test]
    fn unit_order_pairs_lo_and_hi() {
        let schedule = ShiftSchedule::new(17).unwrap();
        let phase = &schedule.phases()[0];
        let order = unit_order(phase, FIRST);
        assert_eq!(order[0..2], [0, 0]);
        assert_eq!(order[2..4], [0, 1]);
        assert_eq!(shift_counts(phase, SECOND), [2, 19, 6, 23]);
    }
}
