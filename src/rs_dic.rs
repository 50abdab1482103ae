//! Compressed rank/select dictionary over a growable bit sequence.
#![cfg(target_pointer_width = "64")]

pub mod enum_code;

use std::io::{Read, Write};

use anyhow::Result;

use crate::broadword;
use crate::Serializable;
use enum_code::CODE_LEN;

const SMALL_BLOCK_LEN: usize = 64;
const LARGE_BLOCK_LEN: usize = 1024;
const SMALL_PER_LARGE: usize = LARGE_BLOCK_LEN / SMALL_BLOCK_LEN;
const SELECT_BLOCK_LEN: usize = 4096;

/// Compressed rank/select dictionary over a growable bit sequence.
///
/// [`RsDic`] represents a bit sequence built by [`Self::push_bit()`] and
/// answers access/rank/select queries in constant time without decompressing
/// more than one 64-bit block.
///
/// The sequence is chopped into small blocks of 64 bits, each stored as an
/// enumerative code whose length depends only on the block's popcount (see
/// [`enum_code`]), so skewed or clustered inputs compress well below one bit
/// per bit. Per large block of 1024 bits, the structure keeps a cumulative
/// popcount and a bit pointer into the code stream; per small block, its
/// popcount. Sparse samples locating every 4096-th one and zero bound the
/// scan performed by select queries.
///
/// # Examples
///
/// ```
/// use rsdic::RsDic;
///
/// let mut rs = RsDic::new();
/// for b in [true, false, false, true] {
///     rs.push_bit(b);
/// }
///
/// assert_eq!(rs.len(), 4);
/// assert_eq!(rs.num_ones(), 2);
///
/// assert_eq!(rs.access(1), Some(false));
/// assert_eq!(rs.rank1(4), 2);
/// assert_eq!(rs.select1(1), 3);
/// assert_eq!(rs.select0(2), 4); // no 3rd zero
/// ```
///
/// # Credits
///
/// This is a yet another Rust port of Okanohara's
/// [rsdic](https://code.google.com/p/rsdic/), following the layout of its
/// [Go version](https://github.com/hillbig/rsdic).
///
/// # References
///
///  - G. Navarro and E. Providel, "Fast, small, simple rank/select on
///    bitmaps," In SEA, 2012.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RsDic {
    bits: Vec<u64>,
    pointer_blocks: Vec<usize>,
    rank_blocks: Vec<usize>,
    select_one_inds: Vec<usize>,
    select_zero_inds: Vec<usize>,
    rank_small_blocks: Vec<u8>,
    num: usize,
    one_num: usize,
    zero_num: usize,
    last_block: u64,
    last_one_num: usize,
    last_zero_num: usize,
    code_len: usize,
}

impl RsDic {
    /// Creates a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty dictionary in which at least `capa` bits are
    /// reserved.
    pub fn with_capacity(capa: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capa / SMALL_BLOCK_LEN),
            pointer_blocks: Vec::with_capacity(capa / LARGE_BLOCK_LEN),
            rank_blocks: Vec::with_capacity(capa / LARGE_BLOCK_LEN),
            select_one_inds: Vec::with_capacity(capa / SELECT_BLOCK_LEN),
            select_zero_inds: Vec::with_capacity(capa / SELECT_BLOCK_LEN),
            rank_small_blocks: Vec::with_capacity(capa / SMALL_BLOCK_LEN),
            ..Self::default()
        }
    }

    /// Creates a new dictionary from input bit stream `bits`.
    ///
    /// # Arguments
    ///
    ///  - `bits`: Bit stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// let rs = RsDic::from_bits([true, false, false]);
    /// assert_eq!(rs.len(), 3);
    /// assert_eq!(rs.num_zeros(), 2);
    /// ```
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut this = Self::new();
        bits.into_iter().for_each(|b| this.push_bit(b));
        this
    }

    /// Pushes `bit` at the end of the sequence.
    ///
    /// # Complexity
    ///
    /// - Amortized constant
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// let mut rs = RsDic::new();
    /// rs.push_bit(true);
    /// rs.push_bit(false);
    /// assert_eq!(rs.len(), 2);
    /// assert_eq!(rs.num_ones(), 1);
    /// ```
    pub fn push_bit(&mut self, bit: bool) {
        if self.num % SMALL_BLOCK_LEN == 0 {
            self.write_block();
        }
        if bit {
            if self.one_num % SELECT_BLOCK_LEN == 0 {
                self.select_one_inds.push(self.num / LARGE_BLOCK_LEN);
            }
            self.last_block |= 1 << (self.num % SMALL_BLOCK_LEN);
            self.one_num += 1;
            self.last_one_num += 1;
        } else {
            if self.zero_num % SELECT_BLOCK_LEN == 0 {
                self.select_zero_inds.push(self.num / LARGE_BLOCK_LEN);
            }
            self.zero_num += 1;
            self.last_zero_num += 1;
        }
        self.num += 1;
    }

    /// Returns the `pos`-th bit, or [`None`] if out of bounds.
    ///
    /// # Complexity
    ///
    /// - Constant
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// let rs = RsDic::from_bits([true, false, false]);
    /// assert_eq!(rs.access(0), Some(true));
    /// assert_eq!(rs.access(1), Some(false));
    /// assert_eq!(rs.access(3), None);
    /// ```
    pub fn access(&self, pos: usize) -> Option<bool> {
        if pos >= self.num {
            return None;
        }
        if self.is_last_block(pos) {
            return Some((self.last_block >> (pos % SMALL_BLOCK_LEN)) & 1 == 1);
        }
        let lblock = pos / LARGE_BLOCK_LEN;
        let sblock = pos / SMALL_BLOCK_LEN;
        let mut pointer = self.pointer_blocks[lblock];
        for i in lblock * SMALL_PER_LARGE..sblock {
            pointer += CODE_LEN[self.rank_small_blocks[i] as usize] as usize;
        }
        let class = self.rank_small_blocks[sblock];
        let code = self.read_code(pointer, CODE_LEN[class as usize]);
        Some(enum_code::decode_bit(code, class, pos % SMALL_BLOCK_LEN))
    }

    /// Returns the number of occurrences of `bit` from the 0-th bit to the
    /// `pos-1`-th bit, clamped to the total count of `bit` for
    /// `pos >= self.len()`.
    ///
    /// # Complexity
    ///
    /// - Constant
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// let rs = RsDic::from_bits([true, false, false, true]);
    /// assert_eq!(rs.rank(3, true), 1);
    /// assert_eq!(rs.rank(3, false), 2);
    /// assert_eq!(rs.rank(100, true), 2);
    /// ```
    pub fn rank(&self, pos: usize, bit: bool) -> usize {
        if pos >= self.num {
            return rank_by_bit(self.one_num, self.num, bit);
        }
        if self.is_last_block(pos) {
            let after = broadword::popcount(self.last_block >> (pos % SMALL_BLOCK_LEN));
            return rank_by_bit(self.one_num - after, pos, bit);
        }
        let lblock = pos / LARGE_BLOCK_LEN;
        let sblock = pos / SMALL_BLOCK_LEN;
        let mut pointer = self.pointer_blocks[lblock];
        let mut rank = self.rank_blocks[lblock];
        for i in lblock * SMALL_PER_LARGE..sblock {
            let class = self.rank_small_blocks[i];
            pointer += CODE_LEN[class as usize] as usize;
            rank += class as usize;
        }
        if pos % SMALL_BLOCK_LEN == 0 {
            return rank_by_bit(rank, pos, bit);
        }
        let class = self.rank_small_blocks[sblock];
        let code = self.read_code(pointer, CODE_LEN[class as usize]);
        rank += enum_code::rank(code, class, pos % SMALL_BLOCK_LEN);
        rank_by_bit(rank, pos, bit)
    }

    /// Returns the number of ones from the 0-th bit to the `pos-1`-th bit,
    /// clamped to [`Self::num_ones()`] for `pos >= self.len()`.
    ///
    /// # Complexity
    ///
    /// - Constant
    #[inline(always)]
    pub fn rank1(&self, pos: usize) -> usize {
        self.rank(pos, true)
    }

    /// Returns the number of zeros from the 0-th bit to the `pos-1`-th bit,
    /// clamped to [`Self::num_zeros()`] for `pos >= self.len()`.
    ///
    /// # Complexity
    ///
    /// - Constant
    #[inline(always)]
    pub fn rank0(&self, pos: usize) -> usize {
        self.rank(pos, false)
    }

    /// Searches the position of the `k`-th occurrence of `bit`, or
    /// `self.len()` if there is no such occurrence.
    ///
    /// # Complexity
    ///
    /// - Constant
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// let rs = RsDic::from_bits([true, false, false, true]);
    /// assert_eq!(rs.select(1, true), 3);
    /// assert_eq!(rs.select(1, false), 2);
    /// assert_eq!(rs.select(2, true), 4);
    /// ```
    #[inline(always)]
    pub fn select(&self, k: usize, bit: bool) -> usize {
        if bit {
            self.select1(k)
        } else {
            self.select0(k)
        }
    }

    /// Searches the position of the `k`-th bit set, or `self.len()` if
    /// `k >= self.num_ones()`.
    ///
    /// # Complexity
    ///
    /// - Constant
    pub fn select1(&self, k: usize) -> usize {
        if k >= self.one_num {
            return self.num;
        }
        if k >= self.one_num - self.last_one_num {
            let remain = k - (self.one_num - self.last_one_num);
            return self.last_block_ind()
                + broadword::select_in_word(self.last_block, remain).unwrap();
        }
        let mut lblock = self.select_one_inds[k / SELECT_BLOCK_LEN];
        while lblock < self.rank_blocks.len() && k >= self.rank_blocks[lblock] {
            lblock += 1;
        }
        lblock -= 1;
        let mut sblock = lblock * SMALL_PER_LARGE;
        let mut pointer = self.pointer_blocks[lblock];
        let mut remain = k - self.rank_blocks[lblock];
        loop {
            let class = self.rank_small_blocks[sblock];
            if remain < class as usize {
                break;
            }
            remain -= class as usize;
            pointer += CODE_LEN[class as usize] as usize;
            sblock += 1;
        }
        let class = self.rank_small_blocks[sblock];
        let code = self.read_code(pointer, CODE_LEN[class as usize]);
        sblock * SMALL_BLOCK_LEN + enum_code::select1(code, class, remain)
    }

    /// Searches the position of the `k`-th bit unset, or `self.len()` if
    /// `k >= self.num_zeros()`.
    ///
    /// # Complexity
    ///
    /// - Constant
    pub fn select0(&self, k: usize) -> usize {
        if k >= self.zero_num {
            return self.num;
        }
        if k >= self.zero_num - self.last_zero_num {
            let remain = k - (self.zero_num - self.last_zero_num);
            return self.last_block_ind()
                + broadword::select_in_word(!self.last_block, remain).unwrap();
        }
        let mut lblock = self.select_zero_inds[k / SELECT_BLOCK_LEN];
        while lblock < self.rank_blocks.len()
            && k >= lblock * LARGE_BLOCK_LEN - self.rank_blocks[lblock]
        {
            lblock += 1;
        }
        lblock -= 1;
        let mut sblock = lblock * SMALL_PER_LARGE;
        let mut pointer = self.pointer_blocks[lblock];
        let mut remain = k - (lblock * LARGE_BLOCK_LEN - self.rank_blocks[lblock]);
        loop {
            let class = self.rank_small_blocks[sblock];
            let zeros = SMALL_BLOCK_LEN - class as usize;
            if remain < zeros {
                break;
            }
            remain -= zeros;
            pointer += CODE_LEN[class as usize] as usize;
            sblock += 1;
        }
        let class = self.rank_small_blocks[sblock];
        let code = self.read_code(pointer, CODE_LEN[class as usize]);
        sblock * SMALL_BLOCK_LEN + enum_code::select0(code, class, remain)
    }

    /// Returns the `pos`-th bit `b` together with `self.rank(pos, b)`, or
    /// [`None`] if out of bounds.
    ///
    /// This is equivalent to `(self.access(pos), self.rank(pos, b))` but
    /// decodes the containing block only once.
    ///
    /// # Complexity
    ///
    /// - Constant
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// let rs = RsDic::from_bits([true, false, false, true]);
    /// assert_eq!(rs.access_and_rank(1), Some((false, 0)));
    /// assert_eq!(rs.access_and_rank(3), Some((true, 1)));
    /// assert_eq!(rs.access_and_rank(4), None);
    /// ```
    pub fn access_and_rank(&self, pos: usize) -> Option<(bool, usize)> {
        if pos >= self.num {
            return None;
        }
        if self.is_last_block(pos) {
            let offset = pos % SMALL_BLOCK_LEN;
            let bit = (self.last_block >> offset) & 1 == 1;
            let after = broadword::popcount(self.last_block >> offset);
            return Some((bit, rank_by_bit(self.one_num - after, pos, bit)));
        }
        let lblock = pos / LARGE_BLOCK_LEN;
        let sblock = pos / SMALL_BLOCK_LEN;
        let mut pointer = self.pointer_blocks[lblock];
        let mut rank = self.rank_blocks[lblock];
        for i in lblock * SMALL_PER_LARGE..sblock {
            let class = self.rank_small_blocks[i];
            pointer += CODE_LEN[class as usize] as usize;
            rank += class as usize;
        }
        let offset = pos % SMALL_BLOCK_LEN;
        let class = self.rank_small_blocks[sblock];
        let code = self.read_code(pointer, CODE_LEN[class as usize]);
        rank += enum_code::rank(code, class, offset);
        let bit = enum_code::decode_bit(code, class, offset);
        Some((bit, rank_by_bit(rank, pos, bit)))
    }

    /// Returns the number of bits stored.
    pub const fn len(&self) -> usize {
        self.num
    }

    /// Checks if the sequence is empty.
    pub const fn is_empty(&self) -> bool {
        self.num == 0
    }

    /// Returns the number of bits set.
    pub const fn num_ones(&self) -> usize {
        self.one_num
    }

    /// Returns the number of bits unset.
    pub const fn num_zeros(&self) -> usize {
        self.zero_num
    }

    /// Returns the number of heap bytes allocated by the internal arrays.
    ///
    /// # Examples
    ///
    /// ```
    /// use rsdic::RsDic;
    ///
    /// // A homogeneous stream stores no block codes at all.
    /// let rs = RsDic::from_bits(std::iter::repeat(false).take(4096));
    /// assert!(rs.alloc_size_in_bytes() < 4096 / 8);
    /// ```
    pub fn alloc_size_in_bytes(&self) -> usize {
        std::mem::size_of::<u64>()
            * (self.bits.len()
                + self.pointer_blocks.len()
                + self.rank_blocks.len()
                + self.select_one_inds.len()
                + self.select_zero_inds.len())
            + self.rank_small_blocks.len()
    }

    /// Flushes the pending block into the code stream. Called with
    /// `num % SMALL_BLOCK_LEN == 0`; also records the large-block entry when
    /// `num` starts a new large block.
    fn write_block(&mut self) {
        if self.num > 0 {
            let class = self.last_one_num as u8;
            self.rank_small_blocks.push(class);
            let code = enum_code::encode(self.last_block, class);
            self.append_code(code, CODE_LEN[class as usize]);
            self.last_block = 0;
            self.last_one_num = 0;
            self.last_zero_num = 0;
        }
        if self.num % LARGE_BLOCK_LEN == 0 {
            self.rank_blocks.push(self.one_num);
            self.pointer_blocks.push(self.code_len);
        }
    }

    /// Appends the low `len` bits of `code` at bit offset `code_len`.
    #[inline(always)]
    fn append_code(&mut self, code: u64, len: u8) {
        if len == 0 {
            return;
        }
        let len = len as usize;
        let (block, offset) = (
            self.code_len / SMALL_BLOCK_LEN,
            self.code_len % SMALL_BLOCK_LEN,
        );
        if self.bits.len() == block {
            self.bits.push(0);
        }
        self.bits[block] |= code << offset;
        if offset + len > SMALL_BLOCK_LEN {
            self.bits.push(code >> (SMALL_BLOCK_LEN - offset));
        }
        self.code_len += len;
    }

    /// Reads the `len`-bit code at bit offset `pos` of the code stream.
    #[inline(always)]
    fn read_code(&self, pos: usize, len: u8) -> u64 {
        if len == 0 {
            return 0;
        }
        let len = len as usize;
        let (block, offset) = (pos / SMALL_BLOCK_LEN, pos % SMALL_BLOCK_LEN);
        let mut code = self.bits[block] >> offset;
        if offset + len > SMALL_BLOCK_LEN {
            code |= self.bits[block + 1] << (SMALL_BLOCK_LEN - offset);
        }
        if len == SMALL_BLOCK_LEN {
            code
        } else {
            code & ((1 << len) - 1)
        }
    }

    /// Returns the position at which the pending block starts.
    #[inline(always)]
    const fn last_block_ind(&self) -> usize {
        if self.num == 0 {
            return 0;
        }
        ((self.num - 1) / SMALL_BLOCK_LEN) * SMALL_BLOCK_LEN
    }

    #[inline(always)]
    const fn is_last_block(&self, pos: usize) -> bool {
        pos >= self.last_block_ind()
    }
}

impl std::iter::Extend<bool> for RsDic {
    fn extend<I>(&mut self, bits: I)
    where
        I: IntoIterator<Item = bool>,
    {
        bits.into_iter().for_each(|b| self.push_bit(b));
    }
}

#[inline(always)]
const fn rank_by_bit(x: usize, n: usize, bit: bool) -> usize {
    if bit {
        x
    } else {
        n - x
    }
}

impl Serializable for RsDic {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = 0;
        mem += self.bits.serialize_into(&mut writer)?;
        mem += self.pointer_blocks.serialize_into(&mut writer)?;
        mem += self.rank_blocks.serialize_into(&mut writer)?;
        mem += self.select_one_inds.serialize_into(&mut writer)?;
        mem += self.select_zero_inds.serialize_into(&mut writer)?;
        mem += self.rank_small_blocks.serialize_into(&mut writer)?;
        mem += self.num.serialize_into(&mut writer)?;
        mem += self.one_num.serialize_into(&mut writer)?;
        mem += self.zero_num.serialize_into(&mut writer)?;
        mem += self.last_block.serialize_into(&mut writer)?;
        mem += self.last_one_num.serialize_into(&mut writer)?;
        mem += self.last_zero_num.serialize_into(&mut writer)?;
        mem += self.code_len.serialize_into(&mut writer)?;
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let bits = Vec::<u64>::deserialize_from(&mut reader)?;
        let pointer_blocks = Vec::<usize>::deserialize_from(&mut reader)?;
        let rank_blocks = Vec::<usize>::deserialize_from(&mut reader)?;
        let select_one_inds = Vec::<usize>::deserialize_from(&mut reader)?;
        let select_zero_inds = Vec::<usize>::deserialize_from(&mut reader)?;
        let rank_small_blocks = Vec::<u8>::deserialize_from(&mut reader)?;
        let num = usize::deserialize_from(&mut reader)?;
        let one_num = usize::deserialize_from(&mut reader)?;
        let zero_num = usize::deserialize_from(&mut reader)?;
        let last_block = u64::deserialize_from(&mut reader)?;
        let last_one_num = usize::deserialize_from(&mut reader)?;
        let last_zero_num = usize::deserialize_from(&mut reader)?;
        let code_len = usize::deserialize_from(&mut reader)?;
        Ok(Self {
            bits,
            pointer_blocks,
            rank_blocks,
            select_one_inds,
            select_zero_inds,
            rank_small_blocks,
            num,
            one_num,
            zero_num,
            last_block,
            last_one_num,
            last_zero_num,
            code_len,
        })
    }

    fn size_in_bytes(&self) -> usize {
        self.bits.size_in_bytes()
            + self.pointer_blocks.size_in_bytes()
            + self.rank_blocks.size_in_bytes()
            + self.select_one_inds.size_in_bytes()
            + self.select_zero_inds.size_in_bytes()
            + self.rank_small_blocks.size_in_bytes()
            + usize::size_of().unwrap() * 6
            + u64::size_of().unwrap()
    }
}
