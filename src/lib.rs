//! Seqmap: integer-coded representations of biological sequence alignments.
//!
//! This library maps collections of biological sequences onto dense integer
//! matrices under a reversible symbol↔code mapping, and computes statistics
//! over them: Hamming distances, phylogenetic sequence weights, and
//! site-specific / pairwise frequency and correlation tensors.

pub mod analysis;
pub mod base;
pub mod io;
pub mod prelude;

// Re-export commonly used types for convenient external access.
//
// These form the public, stable surface that most consumers of the library
// will use when preparing alignments for downstream statistical models.
pub use base::{Alignment, Alphabet, AlphabetSpec, Error, Result};
