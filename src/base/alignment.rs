use super::alphabet::Alphabet;
use super::errors::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that supplied weights sum to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-8;

/// How to resolve the alphabet when building an alignment from raw codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AlphabetSpec {
    /// Infer a default alphabet from the largest observed code. Best-effort:
    /// if no preset covers the codes, the alignment is left unmapped and a
    /// warning is printed.
    #[default]
    Auto,
    /// Raw-integer mode, no symbol mapping.
    None,
    /// Use the given alphabet; out-of-range codes are remapped to its
    /// default code, or rejected if it has none.
    Known(Alphabet),
}

/// A fixed-length collection of integer-coded sequences.
///
/// Sequences are stored as the columns of a dense `L x M` matrix held in a
/// single column-major buffer, so each sequence is one contiguous slice.
/// Every sequence carries a phylogenetic weight (non-negative, summing to
/// one) and a name; names default to empty strings and need not be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AlignmentRepr", into = "AlignmentRepr")]
pub struct Alignment {
    /// Column-major codes: sequence `m` occupies `data[m*length..(m+1)*length]`
    data: Vec<u8>,
    /// Number of positions per sequence (L)
    length: usize,
    /// Symbol mapping, absent in raw-integer mode
    alphabet: Option<Alphabet>,
    /// Per-sequence weights, length M, sum to one
    weights: Vec<f64>,
    /// Per-sequence labels, length M
    names: Vec<String>,
}

impl Alignment {
    /// Build an alignment from sequences given as rows.
    ///
    /// All sequences must be non-empty and of equal length. The alphabet is
    /// resolved according to `spec`; with an explicit alphabet the codes are
    /// validated against its range (default-mapped when it has a default),
    /// so an alignment with broken invariants is never produced.
    pub fn from_sequences(rows: Vec<Vec<u8>>, spec: AlphabetSpec) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyAlignment);
        }
        let length = rows[0].len();
        if length == 0 {
            return Err(Error::ShapeMismatch(
                "sequences must have at least one position".into(),
            ));
        }
        for row in &rows {
            if row.len() != length {
                return Err(Error::LengthMismatch {
                    left: length,
                    right: row.len(),
                });
            }
        }

        let nseq = rows.len();
        let mut data = Vec::with_capacity(length * nseq);
        for row in rows {
            data.extend_from_slice(&row);
        }

        let alphabet = resolve_alphabet(&mut data, spec)?;
        Ok(Self {
            data,
            length,
            alphabet,
            weights: vec![1.0 / nseq as f64; nseq],
            names: vec![String::new(); nseq],
        })
    }

    /// Build from a matrix whose orientation is detected against the
    /// declared sequence length: rows are taken as sequences when they have
    /// `expected_length` entries; otherwise, if the matrix has
    /// `expected_length` rows, sequences are read off its columns.
    pub fn from_matrix(
        matrix: Vec<Vec<u8>>,
        expected_length: usize,
        spec: AlphabetSpec,
    ) -> Result<Self> {
        if matrix.is_empty() {
            return Err(Error::EmptyAlignment);
        }
        if matrix[0].len() == expected_length {
            return Self::from_sequences(matrix, spec);
        }
        if matrix.len() == expected_length {
            let ncols = matrix[0].len();
            for row in &matrix {
                if row.len() != ncols {
                    return Err(Error::ShapeMismatch(format!(
                        "ragged matrix: rows of {} and {} entries",
                        ncols,
                        row.len()
                    )));
                }
            }
            let transposed: Vec<Vec<u8>> = (0..ncols)
                .map(|m| (0..expected_length).map(|i| matrix[i][m]).collect())
                .collect();
            return Self::from_sequences(transposed, spec);
        }
        Err(Error::ShapeMismatch(format!(
            "matrix of {} x {} does not match declared sequence length {}",
            matrix.len(),
            matrix[0].len(),
            expected_length
        )))
    }

    /// Number of sequences (M).
    #[inline(always)]
    pub fn nseq(&self) -> usize {
        self.weights.len()
    }

    /// Number of positions per sequence (L).
    #[inline(always)]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Raw column-major code buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Symbol mapping, if attached.
    #[inline]
    pub fn alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    /// Per-sequence phylogenetic weights.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Per-sequence names.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Borrowed view of sequence `m`. Panics if out of range; see [`Self::get`].
    #[inline]
    pub fn sequence(&self, m: usize) -> &[u8] {
        &self.data[m * self.length..(m + 1) * self.length]
    }

    /// Borrowed view of sequence `m`, or `None` when out of range.
    #[inline]
    pub fn get(&self, m: usize) -> Option<&[u8]> {
        (m < self.nseq()).then(|| self.sequence(m))
    }

    /// Mutable view of sequence `m`: writes go straight into the alignment's
    /// storage. Panics if out of range.
    #[inline]
    pub fn sequence_mut(&mut self, m: usize) -> &mut [u8] {
        let length = self.length;
        &mut self.data[m * length..(m + 1) * length]
    }

    /// Contiguous view of the sequence range `range` (columns
    /// `range.start..range.end` of the matrix). Panics if out of range.
    #[inline]
    pub fn sequence_range(&self, range: std::ops::Range<usize>) -> &[u8] {
        &self.data[range.start * self.length..range.end * self.length]
    }

    /// Iterate over sequences in column order.
    pub fn sequences(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.length)
    }

    /// Iterate over `(sequence, weight)` pairs in column order.
    pub fn weighted_sequences(&self) -> impl Iterator<Item = (&[u8], f64)> {
        self.sequences().zip(self.weights.iter().copied())
    }

    /// Replace the weights. Fails with [`Error::ShapeMismatch`] on a length
    /// disagreement and [`Error::WeightSumInvalid`] when the weights are
    /// negative or do not sum to one within [`WEIGHT_TOLERANCE`].
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.nseq() {
            return Err(Error::ShapeMismatch(format!(
                "{} weights for {} sequences",
                weights.len(),
                self.nseq()
            )));
        }
        validate_weights(&weights)?;
        self.weights = weights;
        Ok(())
    }

    /// Replace the sequence names.
    pub fn set_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.nseq() {
            return Err(Error::ShapeMismatch(format!(
                "{} names for {} sequences",
                names.len(),
                self.nseq()
            )));
        }
        self.names = names;
        Ok(())
    }

    /// Deep-copy the sequences at `indices` into a new, fully independent
    /// alignment. The corresponding weights are carried over and
    /// renormalized to sum to one; the alphabet is shared, not copied.
    pub fn subsample(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::EmptyAlignment);
        }
        let nseq = self.nseq();
        let mut data = Vec::with_capacity(indices.len() * self.length);
        let mut weights = Vec::with_capacity(indices.len());
        let mut names = Vec::with_capacity(indices.len());
        for &m in indices {
            if m >= nseq {
                return Err(Error::IndexOutOfBounds {
                    index: m,
                    len: nseq,
                });
            }
            data.extend_from_slice(self.sequence(m));
            weights.push(self.weights[m]);
            names.push(self.names[m].clone());
        }
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            for w in &mut weights {
                *w /= total;
            }
        } else {
            // All selected sequences carried zero weight: fall back to uniform
            let n = weights.len();
            weights.fill(1.0 / n as f64);
        }
        Ok(Self {
            data,
            length: self.length,
            alphabet: self.alphabet.clone(),
            weights,
            names,
        })
    }

    /// Sample `m` distinct sequences uniformly at random, without
    /// replacement. Fails with [`Error::InsufficientSequences`] when `m`
    /// exceeds the number of sequences.
    pub fn subsample_random<R: Rng>(&self, m: usize, rng: &mut R) -> Result<Self> {
        let nseq = self.nseq();
        if m > nseq {
            return Err(Error::InsufficientSequences {
                requested: m,
                available: nseq,
            });
        }
        let indices = rand::seq::index::sample(rng, nseq, m).into_vec();
        self.subsample(&indices)
    }
}

/// Check non-negativity and unit sum.
fn validate_weights(weights: &[f64]) -> Result<()> {
    if let Some(w) = weights.iter().find(|w| **w < 0.0 || !w.is_finite()) {
        return Err(Error::WeightSumInvalid(format!("weight {w} is not valid")));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(Error::WeightSumInvalid(format!(
            "weights sum to {sum}, expected 1"
        )));
    }
    Ok(())
}

/// Resolve an [`AlphabetSpec`] against the observed codes, remapping
/// out-of-range codes to the alphabet's default where possible.
fn resolve_alphabet(data: &mut [u8], spec: AlphabetSpec) -> Result<Option<Alphabet>> {
    match spec {
        AlphabetSpec::None => Ok(None),
        AlphabetSpec::Auto => {
            let max = data.iter().copied().max().unwrap_or(0);
            match Alphabet::default_alphabet(max as usize + 1) {
                Ok(alphabet) => Ok(Some(alphabet)),
                Err(_) => {
                    eprintln!(
                        "Warning: no default alphabet covers code {max}; \
                         alignment left without symbol mapping"
                    );
                    Ok(None)
                }
            }
        }
        AlphabetSpec::Known(alphabet) => {
            let size = alphabet.len();
            for code in data.iter_mut() {
                if (*code as usize) < size {
                    continue;
                }
                match alphabet.default_code() {
                    Some(default) => *code = default,
                    None => {
                        return Err(Error::UnknownCode { code: *code, size });
                    }
                }
            }
            Ok(Some(alphabet))
        }
    }
}

/// Serialization surface for [`Alignment`]. Deserialization goes through
/// [`TryFrom`] so that decoded alignments satisfy the same invariants as
/// constructed ones: a consistent `L x M` buffer, matching weight and name
/// lengths, valid weights, and codes within the alphabet's range.
#[derive(Serialize, Deserialize)]
struct AlignmentRepr {
    data: Vec<u8>,
    length: usize,
    alphabet: Option<Alphabet>,
    weights: Vec<f64>,
    names: Vec<String>,
}

impl TryFrom<AlignmentRepr> for Alignment {
    type Error = Error;

    fn try_from(repr: AlignmentRepr) -> Result<Self> {
        let AlignmentRepr {
            mut data,
            length,
            alphabet,
            weights,
            names,
        } = repr;
        let nseq = weights.len();
        if nseq == 0 {
            return Err(Error::EmptyAlignment);
        }
        if length == 0 {
            return Err(Error::ShapeMismatch(
                "sequences must have at least one position".into(),
            ));
        }
        if data.len() != length * nseq {
            return Err(Error::ShapeMismatch(format!(
                "{} codes for {} sequences of length {}",
                data.len(),
                nseq,
                length
            )));
        }
        if names.len() != nseq {
            return Err(Error::ShapeMismatch(format!(
                "{} names for {} sequences",
                names.len(),
                nseq
            )));
        }
        validate_weights(&weights)?;
        let alphabet = match alphabet {
            Some(a) => resolve_alphabet(&mut data, AlphabetSpec::Known(a))?,
            None => None,
        };
        Ok(Self {
            data,
            length,
            alphabet,
            weights,
            names,
        })
    }
}

impl From<Alignment> for AlignmentRepr {
    fn from(aln: Alignment) -> Self {
        Self {
            data: aln.data,
            length: aln.length,
            alphabet: aln.alphabet,
            weights: aln.weights,
            names: aln.names,
        }
    }
}
