//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use seqmap::prelude::*;
//!
//! let alphabet = Alphabet::dna_gapped();
//! let codes = alphabet.encode("AC-GT").unwrap();
//! assert_eq!(alphabet.decode(&codes).unwrap(), "AC-GT");
//! ```

pub use crate::base::{translate, Alignment, Alphabet, AlphabetSpec, Error, Result};

// Analysis module re-exports
pub use crate::analysis::{
    compute_weights, compute_weights_in_place, cross_hamming, hamming, hamming_distance,
    pairwise_correlations, pairwise_frequencies, pairwise_hamming, pairwise_hamming_matrix,
    site_specific_frequencies,
};

pub use crate::io::{read_fasta, write_fasta};
