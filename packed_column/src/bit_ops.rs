//! Bit-field insert/extract over a little-endian stream of `u64` words.

use crate::index::BitPos;

/// Width of one backing word.
pub const WORD_BITS: u32 = u64::BITS;

/// Mask covering the low `bit_width` bits.
#[inline(always)]
pub const fn low_mask(bit_width: u32) -> u64 {
    if bit_width >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    }
}

/// ORs an already masked `value` into the stream at `pos`.
///
/// The destination bits must still be zero; a field crossing a word boundary
/// writes its high bits into the next word, which must exist.
#[inline(always)]
pub fn or_bits(words: &mut [u64], pos: BitPos, bit_width: u32, value: u64) {
    debug_assert_eq!(value & !low_mask(bit_width), 0);
    words[pos.word] |= value << pos.bit;
    if pos.straddles(bit_width) {
        words[pos.word + 1] |= value >> (WORD_BITS - pos.bit);
    }
}

/// Reads the `bit_width`-bit field starting at `pos`, zero-extended.
#[inline(always)]
pub fn extract_bits(words: &[u64], pos: BitPos, bit_width: u32) -> u64 {
    let end = pos.bit + bit_width;
    if end <= WORD_BITS {
        // left shift drops the bits above the field, right shift those below it
        (words[pos.word] << (WORD_BITS - end)) >> (WORD_BITS - bit_width)
    } else {
        let low = words[pos.word] >> pos.bit;
        let high = words[pos.word + 1] & low_mask(end - WORD_BITS);
        low | (high << (WORD_BITS - pos.bit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_bits() {
        let mut buf = [0u64; 2];
        let pos = BitPos { word: 0, bit: 3 };
        or_bits(&mut buf, pos, 5, 0b10101);
        assert_eq!(extract_bits(&buf, pos, 5), 0b10101);
        assert_eq!(buf[0], 0b10101 << 3);
    }

    #[test]
    fn straddling_field() {
        let mut buf = [0u64; 2];
        let pos = BitPos { word: 0, bit: 60 };
        or_bits(&mut buf, pos, 17, 0x1_ABCD);
        assert_eq!(buf[0] >> 60, 0xD);
        assert_eq!(buf[1], 0x1ABC);
        assert_eq!(extract_bits(&buf, pos, 17), 0x1_ABCD);
    }

    #[test]
    fn full_word_field() {
        let mut buf = [0u64; 3];
        or_bits(&mut buf, BitPos { word: 1, bit: 0 }, 64, u64::MAX - 1);
        assert_eq!(extract_bits(&buf, BitPos { word: 1, bit: 0 }, 64), u64::MAX - 1);
        assert_eq!(buf[0], 0);
        assert_eq!(buf[2], 0);
    }

    #[test]
    fn neighbours_are_not_read() {
        let buf = [u64::MAX, u64::MAX];
        let pos = BitPos { word: 0, bit: 62 };
        assert_eq!(extract_bits(&buf, pos, 1), 1);
        assert_eq!(extract_bits(&buf, pos, 4), 0xF);
        assert_eq!(low_mask(1), 1);
        assert_eq!(low_mask(64), u64::MAX);
    }
}
