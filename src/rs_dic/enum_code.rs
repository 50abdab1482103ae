//! Enumerative (combinadic) coding of 64-bit blocks.
//!
//! A block with `class` bits set (its popcount) is one of `C(64, class)`
//! possible words, and is represented by its index in [0, `C(64, class)`)
//! under the combinadic ordering. The index takes `CODE_LEN[class]` bits, the
//! information-theoretic optimum rounded up. Classes whose enumerative length
//! would be 48 bits or more gain too little over a plain word to be worth the
//! decoding walk, and are stored raw in 64 bits; classes 0 and 64 take no bits
//! at all.
//!
//! Bit `j` of a block, `rank` over its prefixes, and `select` within it are
//! all answered directly on the coded form by replaying the combinadic
//! recursion over a precomputed table of binomial coefficients, never
//! materializing the block.

use crate::broadword;

/// The number of bits in a coded block.
pub const BLOCK_LEN: usize = 64;

/// Enumerative lengths at or above this are stored raw (64 bits).
/// Part of the persisted format.
const RAW_LEN_CUTOFF: u8 = 48;

/// Binomial coefficients `C(n, k)` for `n, k <= 64`, with `C(n, k) = 0` for
/// `k > n`. `C(64, 32) < 2^61`, so every entry fits in a `u64`.
pub const COMBINATION: [[u64; BLOCK_LEN + 1]; BLOCK_LEN + 1] = combination_table();

/// `CODE_LEN[class]` is the number of bits used to code a block of the class.
pub const CODE_LEN: [u8; BLOCK_LEN + 1] = code_len_table();

const fn combination_table() -> [[u64; BLOCK_LEN + 1]; BLOCK_LEN + 1] {
    let mut table = [[0u64; BLOCK_LEN + 1]; BLOCK_LEN + 1];
    let mut n = 0;
    while n <= BLOCK_LEN {
        table[n][0] = 1;
        let mut k = 1;
        while k <= n {
            table[n][k] = table[n - 1][k - 1] + table[n - 1][k];
            k += 1;
        }
        n += 1;
    }
    table
}

const fn code_len_table() -> [u8; BLOCK_LEN + 1] {
    let mut lens = [0u8; BLOCK_LEN + 1];
    let mut class = 0;
    while class <= BLOCK_LEN {
        // ceil(log2(C)) bits index the C codes of the class.
        let mut len = 0u8;
        let mut rest = COMBINATION[BLOCK_LEN][class] - 1;
        while rest > 0 {
            len += 1;
            rest >>= 1;
        }
        lens[class] = if len >= RAW_LEN_CUTOFF {
            BLOCK_LEN as u8
        } else {
            len
        };
        class += 1;
    }
    lens
}

/// Returns the combinadic code of `block`, whose popcount must equal `class`.
///
/// For raw classes the block itself is the code.
#[inline(always)]
pub fn encode(block: u64, class: u8) -> u64 {
    debug_assert_eq!(broadword::popcount(block), class as usize);
    if CODE_LEN[class as usize] == BLOCK_LEN as u8 {
        return block;
    }
    let mut code = 0;
    let mut remain = class as usize;
    for j in 0..BLOCK_LEN {
        if (block >> j) & 1 == 1 {
            code += COMBINATION[BLOCK_LEN - j - 1][remain];
            remain -= 1;
        }
    }
    code
}

/// Returns the `pos`-th bit of the block coded by `(code, class)`.
#[inline(always)]
pub fn decode_bit(mut code: u64, class: u8, pos: usize) -> bool {
    debug_assert!(pos < BLOCK_LEN);
    if CODE_LEN[class as usize] == BLOCK_LEN as u8 {
        return (code >> pos) & 1 == 1;
    }
    let mut remain = class as usize;
    for j in 0..pos {
        let base = COMBINATION[BLOCK_LEN - j - 1][remain];
        if code >= base {
            code -= base;
            remain -= 1;
        }
    }
    code >= COMBINATION[BLOCK_LEN - pos - 1][remain]
}

/// Returns the number of ones in the first `pos` bits of the block coded by
/// `(code, class)`.
#[inline(always)]
pub fn rank(mut code: u64, class: u8, pos: usize) -> usize {
    debug_assert!(pos <= BLOCK_LEN);
    if CODE_LEN[class as usize] == BLOCK_LEN as u8 {
        let mask = if pos == BLOCK_LEN {
            u64::MAX
        } else {
            (1 << pos) - 1
        };
        return broadword::popcount(code & mask);
    }
    let mut remain = class as usize;
    for j in 0..pos {
        let base = COMBINATION[BLOCK_LEN - j - 1][remain];
        if code >= base {
            code -= base;
            remain -= 1;
        }
    }
    class as usize - remain
}

/// Returns the position of the `k`-th set bit of the block coded by
/// `(code, class)`. `k` must be less than `class`.
#[inline(always)]
pub fn select1(mut code: u64, class: u8, mut k: usize) -> usize {
    debug_assert!(k < class as usize);
    if CODE_LEN[class as usize] == BLOCK_LEN as u8 {
        return broadword::select_in_word(code, k).unwrap();
    }
    let mut remain = class as usize;
    for j in 0..BLOCK_LEN {
        let base = COMBINATION[BLOCK_LEN - j - 1][remain];
        if code >= base {
            if k == 0 {
                return j;
            }
            k -= 1;
            code -= base;
            remain -= 1;
        }
    }
    unreachable!();
}

/// Returns the position of the `k`-th unset bit of the block coded by
/// `(code, class)`. `k` must be less than `64 - class`.
#[inline(always)]
pub fn select0(mut code: u64, class: u8, mut k: usize) -> usize {
    debug_assert!(k < BLOCK_LEN - class as usize);
    if CODE_LEN[class as usize] == BLOCK_LEN as u8 {
        return broadword::select_in_word(!code, k).unwrap();
    }
    let mut remain = class as usize;
    for j in 0..BLOCK_LEN {
        let base = COMBINATION[BLOCK_LEN - j - 1][remain];
        if code >= base {
            code -= base;
            remain -= 1;
        } else if k == 0 {
            return j;
        } else {
            k -= 1;
        }
    }
    unreachable!();
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    #[test]
    fn test_combination_table() {
        assert_eq!(COMBINATION[0][0], 1);
        assert_eq!(COMBINATION[64][0], 1);
        assert_eq!(COMBINATION[64][1], 64);
        assert_eq!(COMBINATION[64][64], 1);
        assert_eq!(COMBINATION[64][32], 1832624140942590534);
        assert_eq!(COMBINATION[4][2], 6);
        assert_eq!(COMBINATION[2][3], 0); // k > n
    }

    #[test]
    fn test_code_len_table() {
        assert_eq!(CODE_LEN[0], 0);
        assert_eq!(CODE_LEN[64], 0);
        assert_eq!(CODE_LEN[1], 6);
        assert_eq!(CODE_LEN[2], 11);
        assert_eq!(CODE_LEN[14], 46);
        assert_eq!(CODE_LEN[15], 64);
        assert_eq!(CODE_LEN[32], 64);
        assert_eq!(CODE_LEN[49], 64);
        assert_eq!(CODE_LEN[50], 46);
        for class in 0..=64 {
            assert_eq!(CODE_LEN[class], CODE_LEN[64 - class]);
        }
    }

    fn gen_block(ones: usize, rng: &mut ChaChaRng) -> u64 {
        let mut block = 0u64;
        while broadword::popcount(block) < ones {
            block |= 1 << rng.gen_range(0..64);
        }
        block
    }

    #[test]
    fn test_code_in_range() {
        let mut rng = ChaChaRng::seed_from_u64(7);
        for class in 1..=14u8 {
            for _ in 0..100 {
                let block = gen_block(class as usize, &mut rng);
                let code = encode(block, class);
                assert!(code < COMBINATION[64][class as usize]);
                assert!(code < (1 << CODE_LEN[class as usize]));
            }
        }
    }

    #[test]
    fn test_decode_bit() {
        let mut rng = ChaChaRng::seed_from_u64(11);
        for class in [0u8, 1, 2, 7, 14, 15, 31, 32, 40, 50, 60, 63, 64] {
            for _ in 0..30 {
                let block = gen_block(class as usize, &mut rng);
                let code = encode(block, class);
                for pos in 0..64 {
                    assert_eq!(decode_bit(code, class, pos), (block >> pos) & 1 == 1);
                }
            }
        }
    }

    #[test]
    fn test_rank() {
        let mut rng = ChaChaRng::seed_from_u64(17);
        for class in [0u8, 3, 10, 14, 15, 32, 51, 64] {
            for _ in 0..30 {
                let block = gen_block(class as usize, &mut rng);
                let code = encode(block, class);
                let mut expected = 0;
                for pos in 0..64 {
                    assert_eq!(rank(code, class, pos), expected);
                    expected += ((block >> pos) & 1) as usize;
                }
                assert_eq!(rank(code, class, 64), class as usize);
            }
        }
    }

    #[test]
    fn test_select() {
        let mut rng = ChaChaRng::seed_from_u64(19);
        for class in [1u8, 5, 13, 14, 15, 32, 50, 63, 64] {
            for _ in 0..30 {
                let block = gen_block(class as usize, &mut rng);
                let code = encode(block, class);
                let mut ones = 0;
                let mut zeros = 0;
                for pos in 0..64 {
                    if (block >> pos) & 1 == 1 {
                        assert_eq!(select1(code, class, ones), pos);
                        ones += 1;
                    } else {
                        assert_eq!(select0(code, class, zeros), pos);
                        zeros += 1;
                    }
                }
            }
        }
    }

    #[test]
    fn test_extreme_classes() {
        assert_eq!(encode(0, 0), 0);
        assert_eq!(encode(u64::MAX, 64), 0);
        for pos in 0..64 {
            assert!(!decode_bit(0, 0, pos));
            assert!(decode_bit(0, 64, pos));
            assert_eq!(select0(0, 0, pos), pos);
            assert_eq!(select1(0, 64, pos), pos);
        }
        assert_eq!(rank(0, 0, 64), 0);
        assert_eq!(rank(0, 64, 64), 64);
    }
}
