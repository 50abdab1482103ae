//! # Compressed rank/select dictionary
//!
//! This crate provides a rank/select dictionary over a growable bit sequence,
//! stored in compressed form while answering all queries in constant time
//! (also called a fully indexable dictionary, FID, in the literature).
//!
//! Conceptually, [`RsDic`] represents a bit sequence `B[0..n)` whose bits are
//! appended one at a time by `push_bit`, and supports
//!
//! - `access(i)`: returns `B[i]`,
//! - `rank(i, b)`: returns the number of occurrences of bit `b` in `B[0..i)`,
//! - `select(k, b)`: returns the position of the `k`-th occurrence of `b`.
//!
//! The sequence is divided into small blocks of 64 bits, each compressed with
//! an enumerative code: a block with 10 ones takes only 38 bits (see
//! [`rs_dic::enum_code`]). The representation approaches the
//! information-theoretic bound and shrinks further when equal bits cluster
//! (e.g., `000...000111...111000...000`), yet queries decompress at most one
//! block.
//!
//! [`BitVector`] is the companion plain format: uncompressed, with
//! linear-scan queries, useful as a building block and as an exhaustive
//! reference in tests.
//!
//! # Examples
//!
//! ```
//! use rsdic::RsDic;
//!
//! let mut rs = RsDic::new();
//! for b in [true, false, false, true] {
//!     rs.push_bit(b);
//! }
//!
//! assert_eq!(rs.access(1), Some(false));
//! assert_eq!(rs.rank1(4), 2);
//! assert_eq!(rs.select1(1), 3);
//! ```
//!
//! # Serialization
//!
//! All structures implement [`Serializable`], a little-endian field-by-field
//! binary format; see the trait documentation.
//!
//! # References
//!
//!  - G. Navarro and E. Providel, "Fast, small, simple rank/select on
//!    bitmaps," In SEA, 2012.

pub mod bit_vector;
pub mod broadword;
pub mod rs_dic;
pub mod serial;

pub use bit_vector::BitVector;
pub use rs_dic::RsDic;
pub use serial::Serializable;
