//! Phylogenetic reweighting by neighbor counting.
//!
//! Over-represented near-duplicate sequences bias every downstream
//! statistic; the standard correction weights each sequence by the inverse
//! of its neighbor count under a Hamming-distance threshold.

use crate::base::{Alignment, Result};
use rayon::prelude::*;

/// Compute phylogenetic correction weights for the sequences of an
/// alignment.
///
/// The weight of a sequence is `1/N`, where `N` is the number of sequences
/// at unnormalized Hamming distance strictly less than `H` from it,
/// including the sequence itself. The threshold is `H = floor(θ·L)`,
/// clamped to at least 1 so the self-count always applies.
///
/// Returns `(weights, Meff)` where `Meff` is the sum of the raw weights
/// before normalization (the effective number of sequences). If
/// `normalize`, the returned weights are divided by `Meff` so they sum to
/// one.
///
/// The per-sequence neighbor counts are independent and computed in
/// parallel over a read-only view of the alignment.
pub fn compute_weights(alignment: &Alignment, theta: f64, normalize: bool) -> (Vec<f64>, f64) {
    let threshold = ((theta * alignment.length() as f64).floor() as usize).max(1);
    let m = alignment.nseq();

    let mut weights: Vec<f64> = (0..m)
        .into_par_iter()
        .map(|i| {
            let x = alignment.sequence(i);
            let neighbors = alignment
                .sequences()
                .filter(|y| within_threshold(x, y, threshold))
                .count();
            1.0 / neighbors as f64
        })
        .collect();

    let meff: f64 = weights.iter().sum();
    if normalize {
        for w in &mut weights {
            *w /= meff;
        }
    }
    (weights, meff)
}

/// Compute phylogenetic weights and store them in the alignment.
///
/// The stored weights are always normalized, keeping the alignment's
/// sum-to-one invariant; the effective sequence count `Meff` is returned.
pub fn compute_weights_in_place(alignment: &mut Alignment, theta: f64) -> Result<f64> {
    let (weights, meff) = compute_weights(alignment, theta, true);
    alignment.set_weights(weights)?;
    Ok(meff)
}

/// True when the Hamming distance between `x` and `y` is strictly below
/// `threshold`. Exits as soon as the count can no longer stay below it.
#[inline]
fn within_threshold(x: &[u8], y: &[u8], threshold: usize) -> bool {
    let mut distance = 0;
    for (a, b) in x.iter().zip(y) {
        distance += (a != b) as usize;
        if distance >= threshold {
            return false;
        }
    }
    true
}
