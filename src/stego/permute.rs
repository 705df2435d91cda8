// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Unit position selection and permutation.
//!
//! Selects the eligible unit positions of a carrier in raster order and
//! applies a Fisher-Yates shuffle driven by a ChaCha20 PRNG seeded once from
//! the 64-bit seed. Encoder and decoder build the same permutation from the
//! same seed and the same eligible set, which is what lets the decoder find
//! the bits again.
//!
//! # Cross-platform portability
//!
//! The Fisher-Yates shuffle uses `u32` for `gen_range` (not `usize`) to ensure
//! identical permutations on all platforms. `usize` is 32-bit on WASM but
//! 64-bit on native, which causes `rand::Rng::gen_range` to consume different
//! amounts of PRNG entropy per step, producing completely different shuffles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// ChaCha stream used for the permutation.
const PERMUTATION_STREAM: u64 = 0;
/// ChaCha stream used for choosing which channel (or couple) to modify.
const MUTATION_STREAM: u64 = 1;

/// Generator for the traversal permutation.
pub fn permutation_rng(seed: u64) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(PERMUTATION_STREAM);
    rng
}

/// Generator for mutation tie-breaking, independent of the permutation.
pub fn mutation_rng(seed: u64) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(MUTATION_STREAM);
    rng
}

/// Apply Fisher-Yates shuffle using `u32` for portable cross-platform behavior.
fn shuffle_portable(positions: &mut [usize], seed: u64) {
    let mut rng = permutation_rng(seed);
    let n = positions.len();
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=(i as u32)) as usize;
        positions.swap(i, j);
    }
}

/// Collect the positions in `0..count` accepted by `eligible` and shuffle them.
///
/// # Returns
/// Positions in pseudo-random order. Equal seeds and equal eligible sets
/// always produce equal orders.
pub fn select_and_permute(count: usize, seed: u64, eligible: impl Fn(usize) -> bool) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..count).filter(|&p| eligible(p)).collect();
    shuffle_portable(&mut positions, seed);
    positions
}
