// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Roaringish encoder: packs `(key, position)` pairs into sorted `u64`
//! arrays whose layout permits both sorted-set intersection (by masking off
//! the low bits) and bit-level neighbor tests (by inspecting the low bits
//! directly).
//!
//! Encoded word layout (defaults: `key_bits=28`, `payload_msb_bits=18`,
//! `payload_lsb_bits=18`):
//!
//! ```text
//! |  key (28)  | payload_msb (18) | payload_lsb (18) |
//! ```
//!
//! `payload_msb` is the position's window index (`position / payload_lsb_bits`)
//! and `payload_lsb` is a bitmap whose bit `i` means "position
//! `payload_msb * payload_lsb_bits + i` occurs here".

pub mod accessors;

use crate::error::{Error, Result};
use crate::primitives;

/// Default key width in bits — a document id occupies the 28 most
/// significant bits of each encoded word.
pub const DEFAULT_KEY_BITS: u32 = 28;

/// Immutable per-instance encoder. Parameters are fixed at construction;
/// every positional index built against one encoder must keep using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoaringishEncoder {
    key_bits: u32,
    payload_msb_bits: u32,
    payload_lsb_bits: u32,
    key_mask: u64,
    payload_msb_mask: u64,
    payload_lsb_mask: u64,
    header_mask: u64,
}

impl Default for RoaringishEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_BITS)
    }
}

impl RoaringishEncoder {
    /// Build an encoder with the given key width; the remaining 64 -
    /// `key_bits` bits split evenly between `payload_msb` and `payload_lsb`
    /// (the msb half gets the extra bit when the split is odd).
    pub fn new(key_bits: u32) -> Self {
        assert!(key_bits > 0 && key_bits < 64, "key_bits must be in 1..64");
        let payload_bits = 64 - key_bits;
        let payload_msb_bits = payload_bits / 2;
        let payload_lsb_bits = payload_bits - payload_msb_bits;

        let key_mask = n_msb_mask(key_bits);
        let payload_msb_mask = n_msb_mask(payload_msb_bits + key_bits) & !key_mask;
        let payload_lsb_mask = (1u64 << payload_lsb_bits) - 1;
        let header_mask = key_mask | payload_msb_mask;

        if key_bits == DEFAULT_KEY_BITS {
            debug_assert_eq!(key_mask, 0xFFFF_FFF0_0000_0000);
            debug_assert_eq!(payload_msb_mask, 0x0000_000F_FFFC_0000);
            debug_assert_eq!(payload_lsb_mask, 0x0000_0000_0003_FFFF);
        }

        Self {
            key_bits,
            payload_msb_bits,
            payload_lsb_bits,
            key_mask,
            payload_msb_mask,
            payload_lsb_mask,
            header_mask,
        }
    }

    pub fn key_bits(&self) -> u32 {
        self.key_bits
    }

    pub fn payload_msb_bits(&self) -> u32 {
        self.payload_msb_bits
    }

    pub fn payload_lsb_bits(&self) -> u32 {
        self.payload_lsb_bits
    }

    pub fn header_mask(&self) -> u64 {
        self.header_mask
    }

    /// Exclusive upper bound on a representable position (`MAX_POSITION + 1`).
    pub fn max_position(&self) -> u64 {
        1u64 << self.payload_lsb_bits
    }

    fn validate_payload(&self, payload: &[u64]) -> Result<()> {
        let max = self.max_position();
        if let Some(&bad) = payload.iter().find(|&&p| p >= max) {
            return Err(Error::PositionOverflow {
                position: bad,
                max,
            });
        }
        Ok(())
    }

    /// Pack `payload` (positions, ascending within each key group) and
    /// optional parallel `keys` into one `u64` per distinct `(key,
    /// payload_msb)` pair, OR-combining LSB bitmaps of positions that share
    /// a window. `payload` and `keys` (when present) must already be
    /// grouped so that identical `(key, window)` pairs are contiguous —
    /// the builder guarantees this by lex-sorting before encoding.
    pub fn encode(&self, payload: &[u64], keys: Option<&[u64]>) -> Result<Vec<u64>> {
        self.validate_payload(payload)?;
        if payload.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(keys) = keys {
            assert_eq!(keys.len(), payload.len(), "keys/payload length mismatch");
        }

        let lsb_bits = self.payload_lsb_bits as u64;
        let key_shift = 64 - self.key_bits;
        let mut out: Vec<u64> = Vec::with_capacity(payload.len());
        for (i, &p) in payload.iter().enumerate() {
            let window = p / lsb_bits;
            let bit = p % lsb_bits;
            let key_part = keys.map_or(0, |k| k[i] << key_shift);
            let row = key_part | (window << self.payload_lsb_bits) | (1u64 << bit);
            if let Some(last) = out.last_mut() {
                if (*last & self.header_mask) == (row & self.header_mask) {
                    *last |= row & self.payload_lsb_mask;
                    continue;
                }
            }
            out.push(row);
        }
        Ok(out)
    }

    /// Reverse of [`Self::encode`]: returns `(key, positions)` groups in
    /// ascending key order, positions ascending within each group.
    pub fn decode(&self, encoded: &[u64]) -> Vec<(u64, Vec<u64>)> {
        let mut groups: Vec<(u64, Vec<u64>)> = Vec::new();
        for &row in encoded {
            let key = accessors::key(self, row);
            let msb = accessors::payload_msb(self, row);
            let lsb = accessors::payload_lsb(self, row);
            if groups.last().map(|(k, _)| *k) != Some(key) {
                groups.push((key, Vec::new()));
            }
            let positions = &mut groups.last_mut().unwrap().1;
            for bit in 0..self.payload_lsb_bits {
                if lsb & (1u64 << bit) != 0 {
                    positions.push(msb * self.payload_lsb_bits as u64 + bit as u64);
                }
            }
        }
        groups
    }

    /// Like [`Self::decode`] but discards the key, returning positions only
    /// (for callers that already know the key, e.g. a single document).
    pub fn decode_positions_only(&self, encoded: &[u64]) -> Vec<u64> {
        let mut positions = Vec::new();
        for &row in encoded {
            let msb = accessors::payload_msb(self, row);
            let lsb = accessors::payload_lsb(self, row);
            for bit in 0..self.payload_lsb_bits {
                if lsb & (1u64 << bit) != 0 {
                    positions.push(msb * self.payload_lsb_bits as u64 + bit as u64);
                }
            }
        }
        positions
    }

    pub fn keys(&self) -> u64 {
        self.key_mask
    }

    /// Return the subsequence of each input whose header (`key |
    /// payload_msb`) appears in the other, in ascending `lhs` order.
    pub fn intersect(&self, lhs: &[u64], rhs: &[u64]) -> (Vec<u64>, Vec<u64>) {
        let (li, ri) = primitives::intersect(lhs, rhs, self.header_mask);
        (
            li.into_iter().map(|i| lhs[i]).collect(),
            ri.into_iter().map(|i| rhs[i]).collect(),
        )
    }

    /// Intersect `lhs` against `rhs` shifted down by `shift` positions:
    /// a pair matches when `lhs` has a position `p` and `rhs` has a
    /// position `p + shift` (the same document, obviously). Used to test
    /// phrase adjacency — `shift=1` checks "does the next term occur
    /// immediately after".
    ///
    /// `intersect_rshift(lhs, rhs, 0)` is defined to equal
    /// [`Self::intersect`].
    pub fn intersect_rshift(&self, lhs: &[u64], rhs: &[u64], shift: u64) -> (Vec<u64>, Vec<u64>) {
        if shift == 0 {
            return self.intersect(lhs, rhs);
        }
        let w = self.payload_lsb_bits as u64;
        let msb_shift = shift / w;
        let bit_shift = shift % w;

        let mut shifted: Vec<(u64, u64)> = Vec::with_capacity(rhs.len() * 2);
        for &row in rhs {
            let key = row & self.key_mask;
            let msb = accessors::payload_msb(self, row);
            let lsb = row & self.payload_lsb_mask;
            if msb < msb_shift {
                continue; // shifting down would underflow past the first window
            }
            let new_msb = msb - msb_shift;
            let bits_same_window = lsb >> bit_shift;
            if bits_same_window != 0 {
                let header = key | (new_msb << self.payload_lsb_bits);
                shifted.push((header, bits_same_window));
            }
            if bit_shift > 0 && new_msb >= 1 {
                let carry_mask = (1u64 << bit_shift) - 1;
                let carry_bits = (lsb & carry_mask) << (w - bit_shift);
                if carry_bits != 0 {
                    let header = key | ((new_msb - 1) << self.payload_lsb_bits);
                    shifted.push((header, carry_bits));
                }
            }
        }
        shifted.sort_unstable_by_key(|&(h, _)| h);
        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(shifted.len());
        for (h, bits) in shifted {
            if let Some(last) = merged.last_mut() {
                if last.0 == h {
                    last.1 |= bits;
                    continue;
                }
            }
            merged.push((h, bits));
        }

        let mut lhs_out = Vec::new();
        let mut rhs_out = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        while i < lhs.len() && j < merged.len() {
            let lh = lhs[i] & self.header_mask;
            let (rh, rbits) = merged[j];
            match lh.cmp(&rh) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    lhs_out.push(lhs[i]);
                    rhs_out.push(rh | rbits);
                    i += 1;
                    j += 1;
                }
            }
        }
        (lhs_out, rhs_out)
    }

    /// Return the subsequence of `encoded` whose key is in the sorted
    /// `keys` array. `encoded` and `keys` must each be sorted by key.
    pub fn slice(&self, encoded: &[u64], keys: &[u64]) -> Vec<u64> {
        let key_shift = 64 - self.key_bits;
        let mut out = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        while i < encoded.len() && j < keys.len() {
            let ek = encoded[i] >> key_shift;
            match ek.cmp(&keys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(encoded[i]);
                    i += 1;
                }
            }
        }
        out
    }

    /// Restrict `encoded` (already belonging to a single document, or a
    /// small set of them) to positions in `[min_posn, max_posn]`
    /// (inclusive on both ends, either bound optional). Rows entirely
    /// outside the bound are dropped; rows straddling a bound have their
    /// LSB bitmap masked.
    pub fn restrict_positions(
        &self,
        encoded: &[u64],
        min_posn: Option<u64>,
        max_posn: Option<u64>,
    ) -> Vec<u64> {
        let w = self.payload_lsb_bits as u64;
        let min_window = min_posn.map(|p| p / w);
        let max_window = max_posn.map(|p| p / w);
        let mut out = Vec::with_capacity(encoded.len());
        for &row in encoded {
            let msb = accessors::payload_msb(self, row);
            if let Some(minw) = min_window {
                if msb < minw {
                    continue;
                }
            }
            if let Some(maxw) = max_window {
                if msb > maxw {
                    continue;
                }
            }
            let mut lsb = row & self.payload_lsb_mask;
            if min_window == Some(msb) {
                if let Some(min_posn) = min_posn {
                    let low_bit = min_posn % w;
                    lsb &= !((1u64 << low_bit) - 1);
                }
            }
            if max_window == Some(msb) {
                if let Some(max_posn) = max_posn {
                    let high_bit = max_posn % w;
                    if high_bit + 1 < w {
                        lsb &= (1u64 << (high_bit + 1)) - 1;
                    }
                }
            }
            if lsb != 0 {
                out.push((row & self.header_mask) | lsb);
            }
        }
        out
    }
}

/// The `n` most-significant bits of a 64-bit word, set.
fn n_msb_mask(n: u32) -> u64 {
    if n == 0 {
        0
    } else {
        !0u64 << (64 - n)
    }
}
