use super::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Symbols of the binary preset (q = 2).
pub const BINARY_SYMBOLS: &str = "01";
/// Symbols of the ungapped nucleotide preset (q = 4).
pub const NT_SYMBOLS: &str = "ACGT";
/// Symbols of the gapped nucleotide preset (q = 5).
pub const NT_GAP_SYMBOLS: &str = "-ACGT";
/// Symbols of the gapped amino-acid preset (q = 21).
pub const AA_GAP_SYMBOLS: &str = "-ACDEFGHIKLMNPQRSTVWY";

/// Shared, immutable mapping between symbols and integer codes.
///
/// Codes are `u8`, zero-based, assigned by symbol position. An optional
/// default symbol acts as a fallback target for unknown symbols or
/// out-of-range codes; without one, unknown input is an error.
///
/// Clones are cheap: the lookup tables sit behind `Arc` so one instance can
/// be shared across all alignments that use it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AlphabetRepr", into = "AlphabetRepr")]
pub struct Alphabet {
    /// Symbol at position `k` has code `k`
    chars: Arc<[char]>,
    /// Inverse mapping for fast lookup
    char_to_index: Arc<HashMap<char, u8>>,
    /// Fallback symbol for unknown input, if any
    default_char: Option<char>,
    /// Code of the fallback symbol
    default_index: Option<u8>,
}

impl Alphabet {
    /// Build from symbols known to be unique. Internal constructor backing
    /// the presets; public constructors validate first.
    fn from_parts(chars: Vec<char>, default_char: Option<char>) -> Self {
        let char_to_index: HashMap<char, u8> = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as u8))
            .collect();
        let default_index = default_char.and_then(|c| char_to_index.get(&c).copied());
        Self {
            chars: chars.into(),
            char_to_index: Arc::new(char_to_index),
            default_char,
            default_index,
        }
    }

    /// Create a new alphabet from a list of symbols.
    /// The order determines the code mapping: symbol `i` gets code `i`.
    ///
    /// Fails with [`Error::InvalidMapping`] on duplicate symbols and with
    /// [`Error::UnsupportedCardinality`] when the symbol set does not fit in
    /// a `u8` code range.
    pub fn new(symbols: impl Into<Vec<char>>) -> Result<Self> {
        let chars: Vec<char> = symbols.into();
        if chars.len() > u8::MAX as usize + 1 {
            return Err(Error::UnsupportedCardinality(chars.len()));
        }
        let mut seen = HashMap::new();
        for (i, &c) in chars.iter().enumerate() {
            if let Some(prev) = seen.insert(c, i) {
                return Err(Error::InvalidMapping(format!(
                    "symbol '{c}' appears at positions {prev} and {i}"
                )));
            }
        }
        Ok(Self::from_parts(chars, None))
    }

    /// Create a new alphabet from the characters of a string.
    pub fn from_symbols(symbols: &str) -> Result<Self> {
        Self::new(symbols.chars().collect::<Vec<_>>())
    }

    /// Create an alphabet from an explicit symbol→code mapping.
    /// The codes must form exactly the range `0..n`.
    pub fn from_mapping(mapping: &HashMap<char, u8>) -> Result<Self> {
        let n = mapping.len();
        if n > u8::MAX as usize + 1 {
            return Err(Error::UnsupportedCardinality(n));
        }
        let mut chars: Vec<Option<char>> = vec![None; n];
        for (&c, &code) in mapping {
            let slot = chars
                .get_mut(code as usize)
                .ok_or_else(|| Error::InvalidMapping(format!(
                    "code {code} out of range for {n} symbols"
                )))?;
            if let Some(prev) = slot {
                return Err(Error::InvalidMapping(format!(
                    "code {code} assigned to both '{prev}' and '{c}'"
                )));
            }
            *slot = Some(c);
        }
        // Every slot is filled: n distinct codes in 0..n
        let chars: Vec<char> = chars.into_iter().flatten().collect();
        Ok(Self::from_parts(chars, None))
    }

    /// Set the default symbol used as fallback for unknown symbols/codes.
    /// The symbol must already belong to the alphabet.
    pub fn with_default(mut self, symbol: char) -> Result<Self> {
        let index = self
            .char_to_index
            .get(&symbol)
            .copied()
            .ok_or(Error::UnknownSymbol(symbol))?;
        self.default_char = Some(symbol);
        self.default_index = Some(index);
        Ok(self)
    }

    /// Binary alphabet `01`.
    pub fn binary() -> Self {
        Self::from_parts(BINARY_SYMBOLS.chars().collect(), None)
    }

    /// Standard ungapped DNA alphabet `ACGT`.
    pub fn dna() -> Self {
        Self::from_parts(NT_SYMBOLS.chars().collect(), None)
    }

    /// Gapped DNA alphabet `-ACGT`, gap as default symbol.
    pub fn dna_gapped() -> Self {
        Self::from_parts(NT_GAP_SYMBOLS.chars().collect(), Some('-'))
    }

    /// Gapped amino-acid alphabet `-ACDEFGHIKLMNPQRSTVWY`, gap as default.
    pub fn protein() -> Self {
        Self::from_parts(AA_GAP_SYMBOLS.chars().collect(), Some('-'))
    }

    /// Select a built-in preset by name.
    ///
    /// Recognized names: `binary`, `dna`/`nt`, `dna_gapped`/`nt_gapped`,
    /// `protein`/`aa`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "binary" => Ok(Self::binary()),
            "dna" | "nt" => Ok(Self::dna()),
            "dna_gapped" | "nt_gapped" => Ok(Self::dna_gapped()),
            "protein" | "aa" => Ok(Self::protein()),
            other => Err(Error::InvalidMapping(format!("unknown preset '{other}'"))),
        }
    }

    /// Select the default alphabet for a given cardinality `q`:
    /// binary for `q <= 2`, nucleotides for `q` in 3..=5 (gapped at 5),
    /// amino acids truncated to `q` symbols up to 21. Larger cardinalities
    /// fail with [`Error::UnsupportedCardinality`].
    pub fn default_alphabet(q: usize) -> Result<Self> {
        match q {
            1 | 2 => Ok(Self::binary()),
            3 | 4 => {
                let chars: Vec<char> = NT_SYMBOLS.chars().take(q).collect();
                Ok(Self::from_parts(chars, None))
            }
            5 => Ok(Self::dna_gapped()),
            6..=21 => {
                let chars: Vec<char> = AA_GAP_SYMBOLS.chars().take(q).collect();
                Ok(Self::from_parts(chars, Some('-')))
            }
            _ => Err(Error::UnsupportedCardinality(q)),
        }
    }

    /// Number of symbols (the cardinality `q`).
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Check if the alphabet has no symbols.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// All symbols in code order.
    #[inline]
    pub fn symbols(&self) -> &[char] {
        &self.chars
    }

    /// Check if a symbol belongs to the alphabet.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.char_to_index.contains_key(&c)
    }

    /// Default symbol, if one is set.
    #[inline]
    pub fn default_symbol(&self) -> Option<char> {
        self.default_char
    }

    /// Code of the default symbol, if one is set.
    #[inline]
    pub fn default_code(&self) -> Option<u8> {
        self.default_index
    }

    /// Map a symbol to its code. Unknown symbols map to the default code
    /// when one is set, otherwise fail with [`Error::UnknownSymbol`].
    #[inline]
    pub fn encode_symbol(&self, c: char) -> Result<u8> {
        match self.char_to_index.get(&c) {
            Some(&code) => Ok(code),
            None => self.default_index.ok_or(Error::UnknownSymbol(c)),
        }
    }

    /// Map a code back to its symbol. Out-of-range codes map to the default
    /// symbol when one is set, otherwise fail with [`Error::UnknownCode`].
    #[inline]
    pub fn decode_code(&self, code: u8) -> Result<char> {
        match self.chars.get(code as usize) {
            Some(&c) => Ok(c),
            None => self.default_char.ok_or(Error::UnknownCode {
                code,
                size: self.len(),
            }),
        }
    }

    /// Encode a string of symbols into a code vector.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        s.chars().map(|c| self.encode_symbol(c)).collect()
    }

    /// Decode a code vector into a string of symbols.
    pub fn decode(&self, codes: &[u8]) -> Result<String> {
        codes.iter().map(|&k| self.decode_code(k)).collect()
    }
}

/// Re-encode a sequence from one alphabet into another.
///
/// Each code is decoded under `from` and encoded under `to`; symbols absent
/// from `to` fail with [`Error::UnknownSymbol`] unless `to` has a default.
pub fn translate(seq: &[u8], from: &Alphabet, to: &Alphabet) -> Result<Vec<u8>> {
    seq.iter()
        .map(|&k| from.decode_code(k).and_then(|c| to.encode_symbol(c)))
        .collect()
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in self.chars.iter() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        // Equality is on the code↔symbol mapping only; default settings are
        // ignored. Fast path: same Arc.
        Arc::ptr_eq(&self.chars, &other.chars) || self.chars == other.chars
    }
}

impl Eq for Alphabet {}

/// Serialized form: the symbol string plus the optional default symbol.
#[derive(Serialize, Deserialize)]
struct AlphabetRepr {
    symbols: String,
    default: Option<char>,
}

impl TryFrom<AlphabetRepr> for Alphabet {
    type Error = Error;

    fn try_from(repr: AlphabetRepr) -> Result<Self> {
        let alphabet = Alphabet::from_symbols(&repr.symbols)?;
        match repr.default {
            Some(c) => alphabet.with_default(c),
            None => Ok(alphabet),
        }
    }
}

impl From<Alphabet> for AlphabetRepr {
    fn from(a: Alphabet) -> Self {
        Self {
            symbols: a.chars.iter().collect(),
            default: a.default_char,
        }
    }
}
