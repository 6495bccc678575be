// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Pure field accessors over encoded roaringish words. Kept separate from
//! [`super::RoaringishEncoder`]'s methods so they can be used as plain
//! functions in hot loops without an extra method-call indirection.

use super::RoaringishEncoder;

pub fn key(enc: &RoaringishEncoder, row: u64) -> u64 {
    (row & enc.key_mask) >> (64 - enc.key_bits)
}

pub fn keys(enc: &RoaringishEncoder, rows: &[u64]) -> Vec<u64> {
    rows.iter().map(|&r| key(enc, r)).collect()
}

/// Ascending, deduplicated keys. Valid only when `rows` is sorted by
/// header (true for any array this crate produces).
pub fn keys_unique(enc: &RoaringishEncoder, rows: &[u64]) -> Vec<u64> {
    let mut out = Vec::new();
    for &r in rows {
        let k = key(enc, r);
        if out.last() != Some(&k) {
            out.push(k);
        }
    }
    out
}

pub fn payload_msb(enc: &RoaringishEncoder, row: u64) -> u64 {
    (row & enc.payload_msb_mask) >> enc.payload_lsb_bits
}

pub fn payload_lsb(enc: &RoaringishEncoder, row: u64) -> u64 {
    row & enc.payload_lsb_mask
}

pub fn header(enc: &RoaringishEncoder, row: u64) -> u64 {
    row & enc.header_mask
}
