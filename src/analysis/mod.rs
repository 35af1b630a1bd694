//! Statistics over integer-coded alignments:
//! - Hamming distances (single pair, all pairs, cross-alignment)
//! - Phylogenetic reweighting by neighbor counting
//! - Site-specific and pairwise frequency/correlation tensors

pub mod distance;
pub mod frequencies;
pub mod weights;

// Re-export commonly used functions
pub use distance::{cross_hamming, hamming, hamming_distance, pairwise_hamming, pairwise_hamming_matrix};
pub use frequencies::{
    pairwise_correlations, pairwise_frequencies, site_specific_frequencies, PairTensor, SiteTensor,
};
pub use weights::{compute_weights, compute_weights_in_place};
