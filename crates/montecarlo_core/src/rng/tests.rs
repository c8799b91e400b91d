//! Unit tests for stream derivation and factories.

use super::*;
use rand::rngs::mock::StepRng;
use rand::{Rng, RngCore};

fn draw(rng: &mut impl RngCore, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.next_u64()).collect()
}

// ========================================================================
// make_rng Tests
// ========================================================================

#[test]
fn test_same_seed_same_sequence() {
    let mut rng1 = make_rng(42, 0);
    let mut rng2 = make_rng(42, 0);

    assert_eq!(draw(&mut rng1, 64), draw(&mut rng2, 64));
}

#[test]
fn test_default_stream_matches_stream_zero() {
    let mut rng1 = make_rng_default(2024);
    let mut rng2 = make_rng(2024, 0);

    assert_eq!(draw(&mut rng1, 16), draw(&mut rng2, 16));
}

#[test]
fn test_different_streams_diverge() {
    let mut rng1 = make_rng(42, 1);
    let mut rng2 = make_rng(42, 2);

    let a = draw(&mut rng1, 5);
    let b = draw(&mut rng2, 5);
    assert!(a.iter().zip(&b).all(|(x, y)| x != y));
}

#[test]
fn test_adjacent_seeds_diverge() {
    let mut rng1 = make_rng(1000, 0);
    let mut rng2 = make_rng(1001, 0);

    assert_ne!(draw(&mut rng1, 4), draw(&mut rng2, 4));
}

#[test]
fn test_seed_and_stream_are_not_interchangeable() {
    // (a, b) and (b, a) must not collapse onto the same stream
    assert_ne!(mix_seed(3, 5), mix_seed(5, 3));
    // nor may seed + stream collisions under simple addition
    assert_ne!(mix_seed(10, 2), mix_seed(11, 1));
}

#[test]
fn test_high_bits_participate() {
    assert_ne!(mix_seed(1, 0), mix_seed(1 | (1 << 40), 0));
    assert_ne!(mix_seed(0, 1), mix_seed(0, 1 | (1 << 40)));
}

#[test]
fn test_stream_rng_records_origin() {
    let rng = make_rng(99, 7);
    assert_eq!(rng.seed(), 99);
    assert_eq!(rng.stream_id(), 7);
}

#[test]
fn test_stream_rng_bounds() {
    assert_eq!(StreamRng::MIN, 0);
    assert_eq!(StreamRng::MAX, u64::MAX);
}

#[test]
fn test_uniform_sanity() {
    let mut rng = make_rng(2024, 0);
    let samples = 50_000;

    let mut mean = 0.0;
    let mut m2 = 0.0;
    for i in 0..samples {
        let x: f64 = rng.gen();
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    let variance = m2 / (samples - 1) as f64;

    assert!((mean - 0.5).abs() < 0.01, "mean = {}", mean);
    assert!((variance - 1.0 / 12.0).abs() < 0.01, "variance = {}", variance);
}

// ========================================================================
// Factory Tests
// ========================================================================

#[test]
fn test_default_factory_uses_stream_zero() {
    let mut from_factory = DefaultRngFactory.create(77);
    let mut direct = make_rng(77, 0);

    assert_eq!(draw(&mut from_factory, 8), draw(&mut direct, 8));
}

#[test]
fn test_default_factory_streams_are_mixed() {
    let mut mixed = DefaultRngFactory.create_stream(77, 3);
    let mut offset = DefaultRngFactory.create(80);

    assert_ne!(draw(&mut mixed, 4), draw(&mut offset, 4));
    assert_eq!(mixed.stream_id(), 3);
}

#[test]
fn test_closure_factory() {
    let factory = |seed: u64| StepRng::new(seed, 1);
    let mut rng = factory.create(10);

    assert_eq!(draw(&mut rng, 3), vec![10, 11, 12]);
}

#[test]
fn test_closure_factory_stream_defaults_to_offset() {
    let factory = |seed: u64| StepRng::new(seed, 0);
    let mut rng = factory.create_stream(100, 4);

    assert_eq!(rng.next_u64(), 104);
}
