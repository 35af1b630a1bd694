//! Core data structures: alphabets and integer-coded alignments.

pub mod alignment;
pub mod alphabet;
pub mod errors;

pub use alignment::{Alignment, AlphabetSpec, WEIGHT_TOLERANCE};
pub use alphabet::{translate, Alphabet};
pub use errors::{Error, Result};
