// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Debug-only invariant checks. Zero-cost in release builds
//! (`debug_assert!`); every function here guards a property the rest of
//! the crate assumes but does not re-verify on every call.

/// `positions` must be strictly ascending (no duplicates, no inversions).
/// The builder is the only place new positions enter the index, so this
/// is the one checkpoint that matters.
#[inline]
pub fn check_strictly_ascending(positions: &[u32]) {
    for w in positions.windows(2) {
        debug_assert!(
            w[0] < w[1],
            "positions not strictly ascending: {} >= {}",
            w[0],
            w[1]
        );
    }
}

/// Encoded roaringish rows must be sorted and header-unique: ascending by
/// `(key, payload_msb)` with no two rows sharing a header.
#[inline]
pub fn check_headers_sorted_unique(encoded: &[u64], header_mask: u64) {
    for w in encoded.windows(2) {
        let h0 = w[0] & header_mask;
        let h1 = w[1] & header_mask;
        debug_assert!(
            h0 < h1,
            "encoded rows not strictly increasing by header: {:#x} >= {:#x}",
            h0,
            h1
        );
    }
}

/// A phrase needs at least two terms and a slop of at least 1.
#[inline]
pub fn check_phrase_bounds(term_ids: &[u32], slop: u32) {
    debug_assert!(term_ids.len() >= 2, "phrase must have at least two terms");
    debug_assert!(slop >= 1, "slop must be at least 1");
}
