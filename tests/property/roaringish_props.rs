//! Properties from the roaringish encoder's contract: round-trip, slice
//! idempotence, intersect symmetry, and the shift=0 identity.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use roaringish_column::RoaringishEncoder;

/// Build a lex-sorted-by-(key, position) input the encoder requires, from
/// an arbitrary bag of (key, position) pairs.
fn grouped_input(pairs: Vec<(u64, u64)>) -> (Vec<u64>, Vec<u64>, Vec<(u64, Vec<u64>)>) {
    let mut groups: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
    for (key, posn) in pairs {
        groups.entry(key).or_default().insert(posn);
    }
    let mut keys = Vec::new();
    let mut payload = Vec::new();
    let mut expected = Vec::new();
    for (key, posns) in &groups {
        let posns: Vec<u64> = posns.iter().copied().collect();
        for &p in &posns {
            keys.push(*key);
            payload.push(p);
        }
        if !posns.is_empty() {
            expected.push((*key, posns));
        }
    }
    (keys, payload, expected)
}

proptest! {
    #[test]
    fn encode_decode_round_trip(
        pairs in prop::collection::vec((0u64..8, 0u64..2000), 0..200)
    ) {
        let encoder = RoaringishEncoder::default();
        let (keys, payload, expected) = grouped_input(pairs);
        let encoded = encoder.encode(&payload, Some(&keys)).unwrap();
        let decoded = encoder.decode(&encoded);
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn slice_by_all_keys_is_idempotent(
        pairs in prop::collection::vec((0u64..8, 0u64..2000), 0..200)
    ) {
        let encoder = RoaringishEncoder::default();
        let (keys, payload, _) = grouped_input(pairs);
        let encoded = encoder.encode(&payload, Some(&keys)).unwrap();
        let all_keys: Vec<u64> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let sliced = encoder.slice(&encoded, &all_keys);
        prop_assert_eq!(&sliced, &encoded);
        let sliced_again = encoder.slice(&sliced, &all_keys);
        prop_assert_eq!(sliced_again, sliced);
    }

    #[test]
    fn intersect_headers_agree_symmetrically(
        lhs_pairs in prop::collection::vec((0u64..6, 0u64..500), 0..80),
        rhs_pairs in prop::collection::vec((0u64..6, 0u64..500), 0..80),
    ) {
        let encoder = RoaringishEncoder::default();
        let (lhs_keys, lhs_payload, _) = grouped_input(lhs_pairs);
        let (rhs_keys, rhs_payload, _) = grouped_input(rhs_pairs);
        let lhs = encoder.encode(&lhs_payload, Some(&lhs_keys)).unwrap();
        let rhs = encoder.encode(&rhs_payload, Some(&rhs_keys)).unwrap();

        let (lhs_matching, rhs_matching) = encoder.intersect(&lhs, &rhs);
        let mask = encoder.header_mask();
        let lhs_headers: Vec<u64> = lhs_matching.iter().map(|&r| r & mask).collect();
        let rhs_headers: Vec<u64> = rhs_matching.iter().map(|&r| r & mask).collect();
        prop_assert_eq!(lhs_headers, rhs_headers);
    }

    #[test]
    fn shifted_intersect_identity_at_shift_zero(
        lhs_pairs in prop::collection::vec((0u64..6, 0u64..500), 0..80),
        rhs_pairs in prop::collection::vec((0u64..6, 0u64..500), 0..80),
    ) {
        let encoder = RoaringishEncoder::default();
        let (lhs_keys, lhs_payload, _) = grouped_input(lhs_pairs);
        let (rhs_keys, rhs_payload, _) = grouped_input(rhs_pairs);
        let lhs = encoder.encode(&lhs_payload, Some(&lhs_keys)).unwrap();
        let rhs = encoder.encode(&rhs_payload, Some(&rhs_keys)).unwrap();

        prop_assert_eq!(encoder.intersect(&lhs, &rhs), encoder.intersect_rshift(&lhs, &rhs, 0));
    }
}
