//! Site-specific and pairwise frequency statistics.
//!
//! All tensors are stored flat in position-major order (position first,
//! then symbol), so the vector and tensor views of a result are
//! index-consistent bijections of each other: site entry `(a, i)` lives at
//! `i·q + a`, pair entry `(a, b, i, j)` at `(i·q + a)·(L·q) + (j·q + b)`.

use crate::base::{Alignment, Error, Result};
use rayon::prelude::*;

/// Site-specific symbol frequencies: a `q x L` tensor where entry `(a, i)`
/// is the weighted fraction of sequences carrying code `a` at position `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteTensor {
    q: usize,
    length: usize,
    data: Vec<f64>,
}

impl SiteTensor {
    /// Alphabet cardinality `q`.
    #[inline]
    pub fn q(&self) -> usize {
        self.q
    }

    /// Number of positions `L`.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Entry `(a, i)`. Panics if out of range.
    #[inline]
    pub fn get(&self, a: usize, i: usize) -> f64 {
        self.data[i * self.q + a]
    }

    /// Flat position-major view of length `L·q`.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume into the flat position-major vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Expand into a `q x L` nested matrix (rows are symbols).
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        (0..self.q)
            .map(|a| (0..self.length).map(|i| self.get(a, i)).collect())
            .collect()
    }
}

/// Pairwise statistics between positions: a `q x q x L x L` tensor where
/// entry `(a, b, i, j)` couples code `a` at position `i` with code `b` at
/// position `j`. Used both for joint frequencies and for connected
/// correlations.
#[derive(Debug, Clone, PartialEq)]
pub struct PairTensor {
    q: usize,
    length: usize,
    data: Vec<f64>,
}

impl PairTensor {
    /// Alphabet cardinality `q`.
    #[inline]
    pub fn q(&self) -> usize {
        self.q
    }

    /// Number of positions `L`.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Flat index of entry `(a, b, i, j)`.
    #[inline]
    pub fn flat_index(&self, a: usize, b: usize, i: usize, j: usize) -> usize {
        (i * self.q + a) * (self.length * self.q) + (j * self.q + b)
    }

    /// Entry `(a, b, i, j)`. Panics if out of range.
    #[inline]
    pub fn get(&self, a: usize, b: usize, i: usize, j: usize) -> f64 {
        self.data[self.flat_index(a, b, i, j)]
    }

    /// Flat position-major view of length `(L·q)²`.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume into the flat position-major vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Expand into the `(L·q) x (L·q)` nested matrix.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.length * self.q;
        (0..n)
            .map(|r| self.data[r * n..(r + 1) * n].to_vec())
            .collect()
    }
}

/// Weighted site-specific symbol frequencies of an alignment.
///
/// With `weights = None` the alignment's own weights are used. Supplied
/// weights must be non-negative and match the sequence count; they are
/// divided by their total, so unnormalized weights are accepted. Each
/// column of the result sums to one.
pub fn site_specific_frequencies(
    alignment: &Alignment,
    weights: Option<&[f64]>,
) -> Result<SiteTensor> {
    let q = effective_cardinality(alignment);
    let length = alignment.length();
    let weights = resolve_weights(alignment, weights)?;
    let total: f64 = weights.iter().sum();

    let mut data = vec![0.0; length * q];
    for (seq, &w) in alignment.sequences().zip(weights) {
        for (i, &a) in seq.iter().enumerate() {
            data[i * q + a as usize] += w;
        }
    }
    for f in &mut data {
        *f /= total;
    }

    Ok(SiteTensor { q, length, data })
}

/// Weighted joint frequencies for every pair of positions.
///
/// Entry `(a, b, i, j)` is the weighted fraction of sequences carrying code
/// `a` at position `i` and code `b` at position `j`. The tensor is
/// symmetric under `(a, i) ↔ (b, j)`, and its diagonal blocks `i == j` are
/// indicator-shaped: nonzero only for `a == b`, where they equal the
/// site-specific frequency. Position blocks are filled in parallel.
pub fn pairwise_frequencies(
    alignment: &Alignment,
    weights: Option<&[f64]>,
) -> Result<PairTensor> {
    let q = effective_cardinality(alignment);
    let length = alignment.length();
    let weights = resolve_weights(alignment, weights)?;
    let total: f64 = weights.iter().sum();

    let row = length * q;
    let mut data = vec![0.0; row * row];
    // Chunk c holds all entries with first position i = c
    data.par_chunks_mut(q * row)
        .enumerate()
        .for_each(|(i, chunk)| {
            for (seq, &w) in alignment.sequences().zip(weights) {
                let a = seq[i] as usize;
                for (j, &b) in seq.iter().enumerate() {
                    chunk[a * row + j * q + b as usize] += w;
                }
            }
            for f in chunk.iter_mut() {
                *f /= total;
            }
        });

    Ok(PairTensor { q, length, data })
}

/// Connected correlations between pairs of positions:
/// `f2(a, b, i, j) - f1(a, i) · f1(b, j)`.
pub fn pairwise_correlations(
    alignment: &Alignment,
    weights: Option<&[f64]>,
) -> Result<PairTensor> {
    let f1 = site_specific_frequencies(alignment, weights)?;
    let mut f2 = pairwise_frequencies(alignment, weights)?;

    let q = f2.q;
    let row = f2.length * q;
    f2.data
        .par_chunks_mut(row)
        .enumerate()
        .for_each(|(r, chunk)| {
            // Row r corresponds to (i, a) = (r / q, r % q)
            let fi = f1.as_slice()[r];
            for (c, entry) in chunk.iter_mut().enumerate() {
                *entry -= fi * f1.as_slice()[c];
            }
        });

    Ok(f2)
}

/// Cardinality used for the symbol axis: the alphabet's size when one is
/// attached, otherwise the smallest range covering the observed codes.
fn effective_cardinality(alignment: &Alignment) -> usize {
    match alignment.alphabet() {
        Some(alphabet) => alphabet.len(),
        None => alignment
            .data()
            .iter()
            .copied()
            .max()
            .map_or(1, |m| m as usize + 1),
    }
}

/// Default to the alignment's weights; validate supplied ones.
fn resolve_weights<'a>(alignment: &'a Alignment, weights: Option<&'a [f64]>) -> Result<&'a [f64]> {
    match weights {
        None => Ok(alignment.weights()),
        Some(w) => {
            if w.len() != alignment.nseq() {
                return Err(Error::ShapeMismatch(format!(
                    "{} weights for {} sequences",
                    w.len(),
                    alignment.nseq()
                )));
            }
            if w.iter().any(|w| *w < 0.0 || !w.is_finite()) {
                return Err(Error::WeightSumInvalid(
                    "weights must be non-negative and finite".into(),
                ));
            }
            let total: f64 = w.iter().sum();
            if total <= 0.0 {
                return Err(Error::WeightSumInvalid(
                    "weights must have a positive total".into(),
                ));
            }
            Ok(w)
        }
    }
}
