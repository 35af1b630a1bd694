use thiserror::Error;

/// Error type for alphabet, alignment and analysis operations.
///
/// Construction failures are reported eagerly: an `Alignment` or `Alphabet`
/// that would violate its invariants is never produced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A symbol was not found in the alphabet and no default symbol is set.
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(char),

    /// A code is outside the alphabet's range and no default code is set.
    #[error("unknown code {code} for alphabet of size {size}")]
    UnknownCode { code: u8, size: usize },

    /// A requested alphabet cardinality exceeds the largest built-in preset.
    #[error("unsupported alphabet cardinality {0} (largest preset has 21 symbols)")]
    UnsupportedCardinality(usize),

    /// A symbol-to-code mapping is not a bijection onto 0..n-1.
    #[error("invalid alphabet mapping: {0}")]
    InvalidMapping(String),

    /// Two sequences of different lengths were compared.
    #[error("sequence length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Weights, names or matrix dimensions disagree with the sequence count.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Sampling without replacement requested more sequences than available.
    #[error("requested {requested} sequences but only {available} are available")]
    InsufficientSequences { requested: usize, available: usize },

    /// Supplied weights are negative or do not sum to one.
    #[error("invalid weights: {0}")]
    WeightSumInvalid(String),

    /// An index is outside the valid range.
    #[error("index {index} out of bounds (len = {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// An alignment must contain at least one sequence.
    #[error("alignment must contain at least one sequence")]
    EmptyAlignment,

    /// An operation required an alphabet but the alignment has none.
    #[error("alignment has no alphabet")]
    MissingAlphabet,

    /// An I/O error from reading or writing sequence files.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
