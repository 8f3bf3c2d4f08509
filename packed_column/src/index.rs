use crate::bit_ops::WORD_BITS;

/// Location of an element's first bit: backing word plus bit inside that word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitPos {
    pub word: usize,
    pub bit: u32,
}

impl BitPos {
    /// Position of element `index` in a stream of `bit_width`-bit fields.
    #[inline(always)]
    pub fn of_element(index: usize, bit_width: u32) -> Self {
        let offset = index * bit_width as usize;
        BitPos {
            word: offset / WORD_BITS as usize,
            bit: (offset % WORD_BITS as usize) as u32,
        }
    }

    /// `true` if a field of `bit_width` bits starting here spills into the next word.
    #[inline]
    pub fn straddles(self, bit_width: u32) -> bool {
        self.bit + bit_width > WORD_BITS
    }
}

/// Number of words needed to hold `count` fields, or `None` on overflow.
#[inline]
pub fn words_for(count: usize, bit_width: u32) -> Option<usize> {
    count
        .checked_mul(bit_width as usize)
        .map(|bits| bits.div_ceil(WORD_BITS as usize))
}
