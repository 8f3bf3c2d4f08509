//! Kernel using ordinary integer shifts; compiles on every target.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::drive;
use crate::schedule::{LANES, Phase, ShiftSchedule, WINDOW_UNITS};

/// One bit per lane set where the decoded field equals `value`.
#[inline(always)]
fn group_hits(window: &[u32; WINDOW_UNITS], phase: &Phase, mask: u64, value: u64) -> u8 {
    let mut hits = 0u8;
    for lane in 0..LANES {
        hits |= u8::from(phase.decode(window, lane, mask) == value) << lane;
    }
    hits
}

pub(super) fn scan(
    words: &[u64],
    len: usize,
    schedule: &ShiftSchedule,
    value: u64,
    found: &mut Vec<bool>,
) {
    let phases = schedule.phases();
    let mask = schedule.mask();
    drive(words, len, schedule, found, |window, phase| {
        group_hits(window, &phases[phase], mask, value)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_map_to_bits() {
        let schedule = ShiftSchedule::new(8).unwrap();
        let window = [0x0403_0201, 0x0807_0605, 0, 0, 0, 0, 0, 0];
        let phase = &schedule.phases()[0];
        assert_eq!(group_hits(&window, phase, schedule.mask(), 1), 0b0000_0001);
        assert_eq!(group_hits(&window, phase, schedule.mask(), 8), 0b1000_0000);
        assert_eq!(group_hits(&window, phase, schedule.mask(), 9), 0);
    }
}
