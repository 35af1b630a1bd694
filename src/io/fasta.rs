//! FASTA import and export for alignments.
//!
//! The on-disk format holds symbols; the alignment holds codes. Round-trips
//! go through [`Alphabet::encode`]/[`Alphabet::decode`], so a file read with
//! one alphabet and written back is unchanged.

use crate::base::{Alignment, Alphabet, AlphabetSpec, Error, Result};
use bio::io::fasta;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Read an aligned FASTA file into an [`Alignment`].
///
/// Sequence names are taken from the record ids. All records must have the
/// same length. `AlphabetSpec::Auto` infers a nucleotide or amino-acid
/// preset from the observed symbols; `AlphabetSpec::None` is rejected since
/// symbols cannot be mapped without an alphabet.
pub fn read_fasta<P: AsRef<Path>>(path: P, spec: AlphabetSpec) -> Result<Alignment> {
    let file = File::open(path.as_ref())?;
    let reader = fasta::Reader::new(BufReader::new(file));

    let mut names = Vec::new();
    let mut symbols: Vec<Vec<char>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Io(e.to_string()))?;
        names.push(record.id().to_string());
        symbols.push(
            record
                .seq()
                .iter()
                .map(|&b| (b as char).to_ascii_uppercase())
                .collect(),
        );
    }

    let alphabet = match spec {
        AlphabetSpec::Known(alphabet) => alphabet,
        AlphabetSpec::Auto => infer_alphabet(symbols.iter().flatten().copied())?,
        AlphabetSpec::None => return Err(Error::MissingAlphabet),
    };

    let rows = symbols
        .into_iter()
        .map(|chars| chars.into_iter().map(|c| alphabet.encode_symbol(c)).collect())
        .collect::<Result<Vec<Vec<u8>>>>()?;

    let mut alignment = Alignment::from_sequences(rows, AlphabetSpec::Known(alphabet))?;
    alignment.set_names(names)?;
    Ok(alignment)
}

/// Write an alignment to a FASTA file, decoding codes back into symbols.
///
/// Unnamed sequences are written as `seq_<index>`. Fails with
/// [`Error::MissingAlphabet`] when the alignment has no symbol mapping.
pub fn write_fasta<P: AsRef<Path>>(path: P, alignment: &Alignment) -> Result<()> {
    let alphabet = alignment.alphabet().ok_or(Error::MissingAlphabet)?;
    let file = File::create(path.as_ref())?;
    let mut writer = fasta::Writer::new(BufWriter::new(file));

    for (m, seq) in alignment.sequences().enumerate() {
        let name = &alignment.names()[m];
        let id = if name.is_empty() {
            format!("seq_{m}")
        } else {
            name.clone()
        };
        let text = alphabet.decode(seq)?;
        writer
            .write(&id, None, text.as_bytes())
            .map_err(|e| Error::Io(e.to_string()))?;
    }
    writer.flush().map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}

/// Pick a preset for a set of observed symbols: gapped nucleotides when
/// they all fit, otherwise gapped amino acids. Symbols outside both presets
/// fail with [`Error::UnknownSymbol`] rather than being silently gap-mapped.
fn infer_alphabet(observed: impl Iterator<Item = char>) -> Result<Alphabet> {
    let nt = Alphabet::dna_gapped();
    let aa = Alphabet::protein();
    let mut is_nt = true;
    for c in observed {
        if !aa.contains(c) {
            return Err(Error::UnknownSymbol(c));
        }
        is_nt &= nt.contains(c);
    }
    Ok(if is_nt { nt } else { aa })
}
