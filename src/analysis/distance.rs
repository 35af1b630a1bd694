//! Hamming distance computations over alignments.
//!
//! Pairwise variants are inherently O(M²·L) (O(M·N·L) for the cross form);
//! the `step` strides allow reduced sampling on large inputs.

use crate::base::{Alignment, Error, Result};
use rayon::prelude::*;

/// Count the positions where two equal-length code vectors differ.
///
/// Processes the slices in chunks of 8 for better CPU pipelining; this
/// kernel sits on the hot path of every pairwise computation.
#[inline]
pub fn hamming_distance(x: &[u8], y: &[u8]) -> Result<usize> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let len = x.len();
    let chunks = len / 8;
    let remainder = len % 8;

    let mut distance = 0;
    for i in 0..chunks {
        let base = i * 8;
        distance += (x[base] != y[base]) as usize;
        distance += (x[base + 1] != y[base + 1]) as usize;
        distance += (x[base + 2] != y[base + 2]) as usize;
        distance += (x[base + 3] != y[base + 3]) as usize;
        distance += (x[base + 4] != y[base + 4]) as usize;
        distance += (x[base + 5] != y[base + 5]) as usize;
        distance += (x[base + 6] != y[base + 6]) as usize;
        distance += (x[base + 7] != y[base + 7]) as usize;
    }
    let base = chunks * 8;
    for i in 0..remainder {
        distance += (x[base + i] != y[base + i]) as usize;
    }

    Ok(distance)
}

/// Hamming distance between `x` and `y`, optionally restricted to a subset
/// of positions and normalized by the number of positions compared.
///
/// With `positions = None` all positions are compared. An empty position
/// subset yields 0.
pub fn hamming(
    x: &[u8],
    y: &[u8],
    positions: Option<&[usize]>,
    normalize: bool,
) -> Result<f64> {
    match positions {
        None => {
            let d = hamming_distance(x, y)? as f64;
            Ok(if normalize && !x.is_empty() {
                d / x.len() as f64
            } else {
                d
            })
        }
        Some(positions) => {
            if x.len() != y.len() {
                return Err(Error::LengthMismatch {
                    left: x.len(),
                    right: y.len(),
                });
            }
            let mut d = 0usize;
            for &i in positions {
                if i >= x.len() {
                    return Err(Error::IndexOutOfBounds {
                        index: i,
                        len: x.len(),
                    });
                }
                d += (x[i] != y[i]) as usize;
            }
            Ok(if normalize && !positions.is_empty() {
                d as f64 / positions.len() as f64
            } else {
                d as f64
            })
        }
    }
}

/// Normalized Hamming distances for all ordered pairs `(i, j)` with `i < j`
/// among the sequences sampled every `step`, in lexicographic order:
/// `[(0,1), (0,2), ..., (0,n-1), (1,2), ...]`.
///
/// For `step = 1` the result has `M·(M-1)/2` entries.
pub fn pairwise_hamming(alignment: &Alignment, step: usize) -> Vec<f64> {
    let indices = sampled_indices(alignment.nseq(), step);
    let n = indices.len();
    let length = alignment.length() as f64;

    let mut distances = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        let x = alignment.sequence(indices[i]);
        for &jm in &indices[i + 1..] {
            let d = count_mismatches(x, alignment.sequence(jm));
            distances.push(d as f64 / length);
        }
    }
    distances
}

/// Symmetric matrix of normalized Hamming distances (zero diagonal) among
/// the sequences sampled every `step`. Rows are computed in parallel.
pub fn pairwise_hamming_matrix(alignment: &Alignment, step: usize) -> Vec<Vec<f64>> {
    let indices = sampled_indices(alignment.nseq(), step);
    let n = indices.len();
    let length = alignment.length() as f64;

    (0..n)
        .into_par_iter()
        .map(|i| {
            let x = alignment.sequence(indices[i]);
            let mut row = vec![0.0; n];
            for (j, &jm) in indices.iter().enumerate() {
                if i != j {
                    row[j] = count_mismatches(x, alignment.sequence(jm)) as f64 / length;
                }
            }
            row
        })
        .collect()
}

/// Full rectangular matrix of normalized Hamming distances between the
/// sequences of two alignments, with independent stride selection per side.
/// Entry `[i][j]` is the distance between the i-th sampled sequence of
/// `left` and the j-th sampled sequence of `right`.
pub fn cross_hamming(
    left: &Alignment,
    right: &Alignment,
    step_left: usize,
    step_right: usize,
) -> Result<Vec<Vec<f64>>> {
    if left.length() != right.length() {
        return Err(Error::LengthMismatch {
            left: left.length(),
            right: right.length(),
        });
    }
    let rows = sampled_indices(left.nseq(), step_left);
    let cols = sampled_indices(right.nseq(), step_right);
    let length = left.length() as f64;

    Ok(rows
        .par_iter()
        .map(|&im| {
            let x = left.sequence(im);
            cols.iter()
                .map(|&jm| count_mismatches(x, right.sequence(jm)) as f64 / length)
                .collect()
        })
        .collect())
}

/// Indices `0, step, 2·step, ...` below `n`; a step of 0 is treated as 1.
fn sampled_indices(n: usize, step: usize) -> Vec<usize> {
    (0..n).step_by(step.max(1)).collect()
}

/// Mismatch count for same-length slices coming out of one alignment.
#[inline]
pub(crate) fn count_mismatches(x: &[u8], y: &[u8]) -> usize {
    x.iter().zip(y).filter(|(a, b)| a != b).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::AlphabetSpec;

    fn alignment(rows: Vec<Vec<u8>>) -> Alignment {
        Alignment::from_sequences(rows, AlphabetSpec::None).unwrap()
    }

    #[test]
    fn test_hamming_distance_basic() {
        assert_eq!(hamming_distance(&[1, 2, 1], &[1, 1, 1]).unwrap(), 1);
        assert_eq!(hamming_distance(&[0, 1, 2], &[0, 1, 2]).unwrap(), 0);
    }

    #[test]
    fn test_hamming_distance_long_sequences() {
        // Exercise both the chunked loop and the remainder
        let x: Vec<u8> = (0..37).map(|i| (i % 4) as u8).collect();
        let mut y = x.clone();
        y[0] = 9;
        y[8] = 9;
        y[36] = 9;
        assert_eq!(hamming_distance(&x, &y).unwrap(), 3);
    }

    #[test]
    fn test_hamming_length_mismatch() {
        assert_eq!(
            hamming_distance(&[1, 2], &[1, 2, 3]).unwrap_err(),
            Error::LengthMismatch { left: 2, right: 3 }
        );
    }

    #[test]
    fn test_hamming_normalization() {
        let x = [1, 2, 1];
        let y = [1, 1, 1];
        assert_eq!(hamming(&x, &y, None, false).unwrap(), 1.0);
        assert!((hamming(&x, &y, None, true).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_hamming_symmetry_and_range() {
        let x = [0, 1, 2, 3, 0];
        let y = [3, 1, 0, 3, 1];
        let xy = hamming(&x, &y, None, true).unwrap();
        let yx = hamming(&y, &x, None, true).unwrap();
        assert_eq!(xy, yx);
        assert!((0.0..=1.0).contains(&xy));
        assert_eq!(hamming(&x, &x, None, true).unwrap(), 0.0);
    }

    #[test]
    fn test_hamming_positions_subset() {
        let x = [1, 2, 1, 4];
        let y = [1, 1, 1, 1];
        assert_eq!(hamming(&x, &y, Some(&[0, 2]), false).unwrap(), 0.0);
        assert_eq!(hamming(&x, &y, Some(&[1, 3]), false).unwrap(), 2.0);
        assert!((hamming(&x, &y, Some(&[1, 2, 3]), true).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(hamming(&x, &y, Some(&[]), true).unwrap(), 0.0);
        assert_eq!(
            hamming(&x, &y, Some(&[4]), true).unwrap_err(),
            Error::IndexOutOfBounds { index: 4, len: 4 }
        );
    }

    #[test]
    fn test_pairwise_hamming_order_and_length() {
        let aln = alignment(vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 1],
            vec![1, 1, 1, 1],
            vec![0, 0, 0, 0],
        ]);
        let d = pairwise_hamming(&aln, 1);
        // M(M-1)/2 pairs in lexicographic order
        assert_eq!(d.len(), 6);
        assert!((d[0] - 0.25).abs() < 1e-12); // (0,1)
        assert!((d[1] - 1.0).abs() < 1e-12); // (0,2)
        assert!((d[2] - 0.0).abs() < 1e-12); // (0,3)
        assert!((d[3] - 0.75).abs() < 1e-12); // (1,2)
        assert!((d[5] - 1.0).abs() < 1e-12); // (2,3)
    }

    #[test]
    fn test_pairwise_hamming_step() {
        let aln = alignment(vec![
            vec![0, 0],
            vec![1, 1],
            vec![0, 1],
            vec![1, 0],
        ]);
        // step 2 keeps sequences 0 and 2 only
        let d = pairwise_hamming(&aln, 2);
        assert_eq!(d.len(), 1);
        assert!((d[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_hamming_matrix() {
        let aln = alignment(vec![vec![0, 0, 0, 0], vec![0, 0, 0, 1], vec![1, 1, 1, 1]]);
        let m = pairwise_hamming_matrix(&aln, 1);
        assert_eq!(m.len(), 3);
        for (i, row) in m.iter().enumerate() {
            assert_eq!(row[i], 0.0);
            for (j, &d) in row.iter().enumerate() {
                assert_eq!(d, m[j][i]);
            }
        }
        assert!((m[0][1] - 0.25).abs() < 1e-12);
        assert!((m[1][2] - 0.75).abs() < 1e-12);

        // Matrix entries agree with the vector form
        let v = pairwise_hamming(&aln, 1);
        assert_eq!(v, vec![m[0][1], m[0][2], m[1][2]]);
    }

    #[test]
    fn test_cross_hamming() {
        let left = alignment(vec![vec![0, 0, 0, 0], vec![1, 1, 1, 1]]);
        let right = alignment(vec![vec![0, 0, 0, 0], vec![0, 0, 1, 1], vec![1, 1, 1, 1]]);
        let m = cross_hamming(&left, &right, 1, 1).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].len(), 3);
        assert_eq!(m[0][0], 0.0);
        assert!((m[0][1] - 0.5).abs() < 1e-12);
        assert_eq!(m[0][2], 1.0);
        assert_eq!(m[1][0], 1.0);

        // Independent strides per side
        let strided = cross_hamming(&left, &right, 2, 2).unwrap();
        assert_eq!(strided.len(), 1);
        assert_eq!(strided[0].len(), 2);
        assert_eq!(strided[0][1], m[0][2]);
    }

    #[test]
    fn test_cross_hamming_length_mismatch() {
        let left = alignment(vec![vec![0, 0]]);
        let right = alignment(vec![vec![0, 0, 0]]);
        assert_eq!(
            cross_hamming(&left, &right, 1, 1).unwrap_err(),
            Error::LengthMismatch { left: 2, right: 3 }
        );
    }
}
