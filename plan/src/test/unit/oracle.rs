//! The brute-force enumerator and its rolling hash.

use crate::oracle::{chunk_hash, enumerate};
use crate::test::helpers::shape;

#[test]
fn test_enumerate_slices_the_double_loop() {
    let trace = enumerate(&shape(8, 20, 3, 1));
    assert_eq!(trace.len(), 8);
    assert_eq!(trace[0].a, vec![0, 0, 0, 1, 1, 1, 2, 2]);
    assert_eq!(trace[0].b, vec![0, 1, 2, 0, 1, 2, 0, 1]);
    assert_eq!(trace[7].width, 4, "60 = 7*8 + 4");
    assert_eq!(trace[7].a, vec![18, 19, 19, 19]);
    assert_eq!(trace[7].b, vec![2, 0, 1, 2]);
}

#[test]
fn test_enumerate_single_partial_chunk() {
    let trace = enumerate(&shape(16, 2, 4, 1));
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].width, 8);
    assert_eq!(trace[0].a, vec![0, 0, 0, 0, 1, 1, 1, 1]);
}

#[test]
fn test_hash_is_order_sensitive() {
    // Same lane multiset, different ordering.
    let forward = chunk_hash(&[0, 0, 1, 1], &[0, 1, 0, 1]);
    let swapped = chunk_hash(&[1, 1, 0, 0], &[0, 1, 0, 1]);
    assert_ne!(forward, swapped);

    let rotated = chunk_hash(&[0, 1, 1, 0], &[1, 0, 1, 0]);
    assert_ne!(forward, rotated);
}

#[test]
fn test_hash_distinguishes_a_from_b() {
    assert_ne!(chunk_hash(&[1, 2], &[0, 0]), chunk_hash(&[0, 0], &[1, 2]));
}

#[test]
fn test_hash_is_deterministic() {
    let h1 = chunk_hash(&[5, 6, 7], &[0, 1, 2]);
    let h2 = chunk_hash(&[5, 6, 7], &[0, 1, 2]);
    assert_eq!(h1, h2);
}
