//! Direct tests of the roaringish encoder, independent of the higher-level
//! index it backs.

use roaringish_column::RoaringishEncoder;

#[test]
fn encode_decode_round_trips_positions_per_key() {
    let encoder = RoaringishEncoder::default();
    let payload = vec![0u64, 1, 2, 17, 18, 300];
    let keys = vec![0u64, 0, 0, 0, 1, 1];
    let encoded = encoder.encode(&payload, Some(&keys)).unwrap();
    let decoded = encoder.decode(&encoded);

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0], (0, vec![0, 1, 2, 17]));
    assert_eq!(decoded[1], (1, vec![18, 300]));
}

#[test]
fn decode_positions_only_drops_keys() {
    let encoder = RoaringishEncoder::default();
    let payload = vec![5u64, 400];
    let keys = vec![0u64, 3];
    let encoded = encoder.encode(&payload, Some(&keys)).unwrap();
    let mut positions = encoder.decode_positions_only(&encoded);
    positions.sort_unstable();
    assert_eq!(positions, vec![5, 400]);
}

#[test]
fn encode_rejects_position_overflow() {
    let encoder = RoaringishEncoder::default();
    let too_big = encoder.max_position();
    let err = encoder.encode(&[too_big], None).unwrap_err();
    assert!(matches!(err, roaringish_column::Error::PositionOverflow { .. }));
}

#[test]
fn intersect_returns_shared_headers_only() {
    let encoder = RoaringishEncoder::default();
    // key 0 shares a window (both land in window 0); key 1's windows differ
    // (300/18 = 16, 400/18 = 22), so only the key-0 header is shared.
    let lhs = encoder.encode(&[0, 1, 300], Some(&[0, 0, 1])).unwrap();
    let rhs = encoder.encode(&[1, 400], Some(&[0, 1])).unwrap();
    let (lhs_matching, rhs_matching) = encoder.intersect(&lhs, &rhs);
    assert_eq!(lhs_matching.len(), 1);
    assert_eq!(rhs_matching.len(), 1);
}

#[test]
fn shifted_intersect_identity_at_shift_zero() {
    let encoder = RoaringishEncoder::default();
    let lhs = encoder.encode(&[0, 1, 300], Some(&[0, 0, 1])).unwrap();
    let rhs = encoder.encode(&[1, 400], Some(&[0, 1])).unwrap();
    let direct = encoder.intersect(&lhs, &rhs);
    let shifted = encoder.intersect_rshift(&lhs, &rhs, 0);
    assert_eq!(direct, shifted);
}

#[test]
fn slice_by_key_is_idempotent() {
    let encoder = RoaringishEncoder::default();
    let encoded = encoder.encode(&[0, 5, 9], Some(&[0, 1, 2])).unwrap();
    let all_keys: Vec<u64> = (0..=2).collect();
    let sliced_once = encoder.slice(&encoded, &all_keys);
    let sliced_twice = encoder.slice(&sliced_once, &all_keys);
    assert_eq!(sliced_once, sliced_twice);
    assert_eq!(sliced_once, encoded);
}
