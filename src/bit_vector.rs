//! Growable bit vector in a plain format.

use std::io::{Read, Write};

use anyhow::{anyhow, Result};

use crate::broadword;
use crate::Serializable;

/// The number of bits in a machine word.
pub const WORD_LEN: usize = u64::BITS as usize;

/// Growable bit vector in a plain format.
///
/// Search queries are performed by linear scan in word units; the structure
/// serves as a building block and as an exhaustive reference for indexed
/// structures such as [`RsDic`](crate::RsDic).
///
/// # Examples
///
/// ```
/// use rsdic::BitVector;
///
/// let mut bv = BitVector::new();
/// bv.push_bit(true);
/// bv.push_bit(false);
///
/// assert_eq!(bv.len(), 2);
/// assert_eq!(bv.get_bit(0), Some(true));
/// assert_eq!(bv.rank1(2), Some(1));
/// assert_eq!(bv.select0(0), Some(1));
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    /// Creates a new empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new vector that at least `capa` bits are reserved.
    pub fn with_capacity(capa: usize) -> Self {
        Self {
            words: Vec::with_capacity(Self::words_for(capa)),
            len: 0,
        }
    }

    /// Creates a new vector from input bit stream `bits`.
    ///
    /// # Arguments
    ///
    ///  - `bits`: Bit stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::BitVector;
    ///
    /// let bv = BitVector::from_bits([false, true, false]);
    /// assert_eq!(bv.len(), 3);
    /// assert_eq!(bv.get_bit(1), Some(true));
    /// ```
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut this = Self::new();
        bits.into_iter().for_each(|b| this.push_bit(b));
        this
    }

    /// Returns the `pos`-th bit, or [`None`] if out of bounds.
    #[inline(always)]
    pub fn get_bit(&self, pos: usize) -> Option<bool> {
        if pos < self.len {
            let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
            Some((self.words[block] >> shift) & 1 == 1)
        } else {
            None
        }
    }

    /// Pushes `bit` at the end.
    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) {
        let pos_in_word = self.len % WORD_LEN;
        if pos_in_word == 0 {
            self.words.push(bit as u64);
        } else {
            let cur_word = self.words.last_mut().unwrap();
            *cur_word |= (bit as u64) << pos_in_word;
        }
        self.len += 1;
    }

    /// Returns the `len` bits starting at the `pos`-th bit, or [`None`] if
    ///
    ///  - `len` is greater than [`WORD_LEN`], or
    ///  - `self.len() < pos + len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::BitVector;
    ///
    /// let bv = BitVector::from_bits([true, false, true, false]);
    /// assert_eq!(bv.get_bits(1, 2), Some(0b10));
    /// assert_eq!(bv.get_bits(2, 3), None);
    /// ```
    #[inline(always)]
    pub fn get_bits(&self, pos: usize, len: usize) -> Option<u64> {
        if WORD_LEN < len || self.len() < pos + len {
            return None;
        }
        if len == 0 {
            return Some(0);
        }
        let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
        let mask = if len < WORD_LEN {
            (1 << len) - 1
        } else {
            u64::MAX
        };
        let bits = if shift + len <= WORD_LEN {
            (self.words[block] >> shift) & mask
        } else {
            (self.words[block] >> shift) | ((self.words[block + 1] << (WORD_LEN - shift)) & mask)
        };
        Some(bits)
    }

    /// Pushes `bits` of `len` bits at the end.
    ///
    /// # Arguments
    ///
    ///  - `bits`: Bit chunk set.
    ///  - `len`: Number of bits of the chunk.
    ///
    /// # Errors
    ///
    /// An error is returned if `len` is greater than [`WORD_LEN`].
    ///
    /// # Notes
    ///
    /// If `bits` has active bits other than the lowest `len` bits,
    /// these will be truncated automatically.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use rsdic::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.push_bits(0b11, 2)?;
    /// bv.push_bits(0b101, 3)?;
    /// assert_eq!(bv.get_bits(0, 5), Some(0b10111));
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub fn push_bits(&mut self, bits: u64, len: usize) -> Result<()> {
        if WORD_LEN < len {
            return Err(anyhow!(
                "len must be no greater than {WORD_LEN}, but got {len}."
            ));
        }
        if len == 0 {
            return Ok(());
        }
        let mask = if len < WORD_LEN {
            (1 << len) - 1
        } else {
            u64::MAX
        };
        let bits = bits & mask;

        let pos_in_word = self.len % WORD_LEN;
        if pos_in_word == 0 {
            self.words.push(bits);
        } else {
            let cur_word = self.words.last_mut().unwrap();
            *cur_word |= bits << pos_in_word;
            if len > WORD_LEN - pos_in_word {
                self.words.push(bits >> (WORD_LEN - pos_in_word));
            }
        }
        self.len += len;
        Ok(())
    }

    /// Returns the number of ones from the 0-th bit to the `pos-1`-th bit, or
    /// [`None`] if `self.len() < pos`.
    ///
    /// # Complexity
    ///
    /// - Linear
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::BitVector;
    ///
    /// let bv = BitVector::from_bits([true, false, false, true]);
    /// assert_eq!(bv.rank1(1), Some(1));
    /// assert_eq!(bv.rank1(4), Some(2));
    /// assert_eq!(bv.rank1(5), None);
    /// ```
    pub fn rank1(&self, pos: usize) -> Option<usize> {
        if self.len() < pos {
            return None;
        }
        let mut r = 0;
        let (wpos, left) = (pos / WORD_LEN, pos % WORD_LEN);
        for &w in &self.words[..wpos] {
            r += broadword::popcount(w);
        }
        if left != 0 {
            r += broadword::popcount(self.words[wpos] << (WORD_LEN - left));
        }
        Some(r)
    }

    /// Returns the number of zeros from the 0-th bit to the `pos-1`-th bit, or
    /// [`None`] if `self.len() < pos`.
    ///
    /// # Complexity
    ///
    /// - Linear
    pub fn rank0(&self, pos: usize) -> Option<usize> {
        Some(pos - self.rank1(pos)?)
    }

    /// Searches the position of the `k`-th bit set, or
    /// [`None`] if `k` is no less than the number of ones.
    ///
    /// # Complexity
    ///
    /// - Linear
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::BitVector;
    ///
    /// let bv = BitVector::from_bits([true, false, false, true]);
    /// assert_eq!(bv.select1(0), Some(0));
    /// assert_eq!(bv.select1(1), Some(3));
    /// assert_eq!(bv.select1(2), None);
    /// ```
    pub fn select1(&self, k: usize) -> Option<usize> {
        let mut wpos = 0;
        let mut cur_rank = 0;
        while wpos < self.words.len() {
            let cnt = broadword::popcount(self.words[wpos]);
            if k < cur_rank + cnt {
                break;
            }
            wpos += 1;
            cur_rank += cnt;
        }
        if wpos == self.words.len() {
            return None;
        }
        let sel =
            wpos * WORD_LEN + broadword::select_in_word(self.words[wpos], k - cur_rank).unwrap();
        Some(sel)
    }

    /// Searches the position of the `k`-th bit unset, or
    /// [`None`] if `k` is no less than the number of zeros.
    ///
    /// # Complexity
    ///
    /// - Linear
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::BitVector;
    ///
    /// let bv = BitVector::from_bits([true, false, false, true]);
    /// assert_eq!(bv.select0(0), Some(1));
    /// assert_eq!(bv.select0(1), Some(2));
    /// assert_eq!(bv.select0(2), None);
    /// ```
    pub fn select0(&self, k: usize) -> Option<usize> {
        let mut wpos = 0;
        let mut cur_rank = 0;
        while wpos < self.words.len() {
            let cnt = broadword::popcount(!self.words[wpos]);
            if k < cur_rank + cnt {
                break;
            }
            wpos += 1;
            cur_rank += cnt;
        }
        if wpos == self.words.len() {
            return None;
        }
        let sel =
            wpos * WORD_LEN + broadword::select_in_word(!self.words[wpos], k - cur_rank).unwrap();
        // Overflowed bits in the last word are zero and would be counted by
        // select0.
        (sel < self.len()).then(|| sel)
    }

    /// Returns the number of bits stored.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the vector is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the slice of raw words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Gets the number of words.
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    #[inline(always)]
    const fn words_for(n: usize) -> usize {
        (n + WORD_LEN - 1) / WORD_LEN
    }
}

impl std::iter::Extend<bool> for BitVector {
    fn extend<I>(&mut self, bits: I)
    where
        I: IntoIterator<Item = bool>,
    {
        bits.into_iter().for_each(|b| self.push_bit(b));
    }
}

impl Serializable for BitVector {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = self.words.serialize_into(&mut writer)?;
        mem += self.len.serialize_into(&mut writer)?;
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let words = Vec::<u64>::deserialize_from(&mut reader)?;
        let len = usize::deserialize_from(&mut reader)?;
        Ok(Self { words, len })
    }

    fn size_in_bytes(&self) -> usize {
        self.words.size_in_bytes() + usize::size_of().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn gen_random_bits(len: usize, seed: u64) -> Vec<bool> {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen::<bool>()).collect()
    }

    #[test]
    fn test_push_bits_over_word() {
        let mut bv = BitVector::new();
        let e = bv.push_bits(0b0, 65);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("len must be no greater than 64, but got 65.".to_string())
        );
    }

    #[test]
    fn test_push_bits_truncation() {
        let mut bv = BitVector::new();
        bv.push_bits(0b111, 2).unwrap();
        assert_eq!(bv, BitVector::from_bits([true, true]));
    }

    #[test]
    fn test_push_bits_across_word() {
        let mut bv = BitVector::new();
        bv.push_bits(0, 62).unwrap();
        bv.push_bits(0b011111, 6).unwrap();
        assert_eq!(bv.get_bits(61, 7).unwrap(), 0b0111110);
    }

    #[test]
    fn test_get_bits_full_word() {
        let mut bv = BitVector::new();
        bv.push_bits(0xDEAD_BEEF_CAFE_BABE, 64).unwrap();
        bv.push_bits(0b101, 3).unwrap();
        assert_eq!(bv.get_bits(0, 64), Some(0xDEAD_BEEF_CAFE_BABE));
        assert_eq!(bv.get_bits(2, 64), Some((0xDEAD_BEEF_CAFE_BABEu64 >> 2) | (0b101 << 62)));
    }

    #[test]
    fn test_rank_select_random() {
        for seed in 0..10 {
            let bits = gen_random_bits(1000, seed);
            let bv = BitVector::from_bits(bits.iter().cloned());
            let mut one_rank = 0;
            let mut zero_rank = 0;
            for i in 0..bits.len() {
                assert_eq!(bv.rank1(i), Some(one_rank));
                assert_eq!(bv.rank0(i), Some(zero_rank));
                if bits[i] {
                    assert_eq!(bv.select1(one_rank), Some(i));
                    one_rank += 1;
                } else {
                    assert_eq!(bv.select0(zero_rank), Some(i));
                    zero_rank += 1;
                }
            }
            assert_eq!(bv.select1(one_rank), None);
            assert_eq!(bv.select0(zero_rank), None);
        }
    }

    #[test]
    fn test_select0_last_word_overflow() {
        let bv = BitVector::from_bits(std::iter::repeat(true).take(65));
        assert_eq!(bv.select0(0), None);
    }

    #[test]
    fn test_serialize() {
        let mut bytes = vec![];
        let bv = BitVector::from_bits(gen_random_bits(100, 42));
        let size = bv.serialize_into(&mut bytes).unwrap();
        let other = BitVector::deserialize_from(&bytes[..]).unwrap();
        assert_eq!(bv, other);
        assert_eq!(size, bytes.len());
        assert_eq!(size, bv.size_in_bytes());
    }
}
