//! Broadword operations on `u64` words.
//!
//! The in-word selection follows S. Vigna, "Broadword implementation of
//! rank/select queries," In WEA, 2008.

/// Has the lowest bit of every byte set: `0x0101_0101_0101_0101`.
pub const ONES_STEP_8: u64 = 0x0101_0101_0101_0101;

/// Has the highest bit of every byte set: `0x8080_8080_8080_8080`.
pub const MSBS_STEP_8: u64 = 0x8080_8080_8080_8080;

/// Counts the number of bits set in `x`.
#[inline(always)]
pub const fn popcount(x: u64) -> usize {
    x.count_ones() as usize
}

/// Searches the position of the `k`-th bit set in `x`, or
/// [`None`] if `popcount(x) <= k`.
///
/// # Examples
///
/// ```
/// use rsdic::broadword::select_in_word;
///
/// assert_eq!(select_in_word(0b1101, 0), Some(0));
/// assert_eq!(select_in_word(0b1101, 1), Some(2));
/// assert_eq!(select_in_word(0b1101, 2), Some(3));
/// assert_eq!(select_in_word(0b1101, 3), None);
/// ```
#[inline(always)]
pub fn select_in_word(x: u64, k: usize) -> Option<usize> {
    if popcount(x) <= k {
        return None;
    }
    let k = k as u64;

    // Byte-wise prefix popcounts of x, one count per byte of s.
    let mut s = x - ((x & 0xAAAA_AAAA_AAAA_AAAA) >> 1);
    s = (s & 0x3333_3333_3333_3333) + ((s >> 2) & 0x3333_3333_3333_3333);
    s = ((s + (s >> 4)) & 0x0F0F_0F0F_0F0F_0F0F).wrapping_mul(ONES_STEP_8);

    // Bit offset of the byte containing the answer.
    let b = ((uleq_step_8(s, k.wrapping_mul(ONES_STEP_8)) >> 7).wrapping_mul(ONES_STEP_8) >> 53)
        & !0x7;
    let l = k - (((s << 8) >> b) & 0xFF);

    // Spread the byte into bit-per-byte form and select within it.
    let spread = ((x >> b) & 0xFF).wrapping_mul(ONES_STEP_8) & 0x8040_2010_0804_0201;
    let s = (nonzero_step_8(spread) >> 7).wrapping_mul(ONES_STEP_8);
    let pos = b + ((uleq_step_8(s, l.wrapping_mul(ONES_STEP_8)) >> 7).wrapping_mul(ONES_STEP_8)
        >> 56);
    Some(pos as usize)
}

/// Parallel unsigned `<=` over the bytes of `x` and `y`,
/// leaving the result in the highest bit of each byte.
#[inline(always)]
const fn uleq_step_8(x: u64, y: u64) -> u64 {
    ((((y | MSBS_STEP_8) - (x & !MSBS_STEP_8)) | (x ^ y)) ^ (x & !y)) & MSBS_STEP_8
}

/// Parallel `!= 0` over the bytes of `x`,
/// leaving the result in the highest bit of each byte.
#[inline(always)]
const fn nonzero_step_8(x: u64) -> u64 {
    (((x | MSBS_STEP_8) - ONES_STEP_8) | x) & MSBS_STEP_8
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn select_in_word_naive(x: u64, k: usize) -> Option<usize> {
        let mut cnt = 0;
        for i in 0..64 {
            if (x >> i) & 1 == 1 {
                if cnt == k {
                    return Some(i);
                }
                cnt += 1;
            }
        }
        None
    }

    #[test]
    fn test_select_in_word_zeros() {
        assert_eq!(select_in_word(0, 0), None);
    }

    #[test]
    fn test_select_in_word_ones() {
        for k in 0..64 {
            assert_eq!(select_in_word(u64::MAX, k), Some(k));
        }
        assert_eq!(select_in_word(u64::MAX, 64), None);
    }

    #[test]
    fn test_select_in_word_single_bit() {
        for i in 0..64 {
            assert_eq!(select_in_word(1 << i, 0), Some(i));
            assert_eq!(select_in_word(1 << i, 1), None);
        }
    }

    #[test]
    fn test_select_in_word_random() {
        let mut rng = ChaChaRng::seed_from_u64(13);
        for _ in 0..10000 {
            let x = rng.gen::<u64>();
            for k in 0..popcount(x) + 1 {
                assert_eq!(select_in_word(x, k), select_in_word_naive(x, k));
            }
        }
    }
}
