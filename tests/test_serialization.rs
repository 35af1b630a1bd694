//! Integration tests for serialization: alphabets and alignments must
//! round-trip through JSON without losing their mappings or weights.

use seqmap::base::{Alignment, Alphabet, AlphabetSpec};

#[test]
fn test_alphabet_serialization() {
    let alphabet = Alphabet::dna_gapped();
    let json = serde_json::to_string(&alphabet).unwrap();
    let deserialized: Alphabet = serde_json::from_str(&json).unwrap();

    assert_eq!(alphabet, deserialized);
    assert_eq!(deserialized.default_symbol(), Some('-'));
    assert_eq!(deserialized.encode("AC-GT").unwrap(), alphabet.encode("AC-GT").unwrap());
}

#[test]
fn test_alphabet_serialization_without_default() {
    let alphabet = Alphabet::from_symbols("xyz").unwrap();
    let json = serde_json::to_string(&alphabet).unwrap();
    let deserialized: Alphabet = serde_json::from_str(&json).unwrap();

    assert_eq!(alphabet, deserialized);
    assert_eq!(deserialized.default_symbol(), None);
}

#[test]
fn test_alphabet_deserialization_rejects_duplicates() {
    let json = r#"{"symbols":"AAC","default":null}"#;
    assert!(serde_json::from_str::<Alphabet>(json).is_err());
}

#[test]
fn test_alignment_serialization() {
    let mut aln = Alignment::from_sequences(
        vec![vec![0, 1, 2, 3], vec![3, 2, 1, 0]],
        AlphabetSpec::Auto,
    )
    .unwrap();
    aln.set_names(vec!["a".into(), "b".into()]).unwrap();
    aln.set_weights(vec![0.75, 0.25]).unwrap();

    let json = serde_json::to_string(&aln).unwrap();
    let deserialized: Alignment = serde_json::from_str(&json).unwrap();

    assert_eq!(aln, deserialized);
    assert_eq!(deserialized.sequence(1), &[3, 2, 1, 0]);
    assert_eq!(deserialized.weights(), &[0.75, 0.25]);
    assert_eq!(deserialized.names(), &["a", "b"]);
    assert_eq!(deserialized.alphabet().unwrap(), &Alphabet::dna());
}

#[test]
fn test_alignment_serialization_raw_mode() {
    let aln =
        Alignment::from_sequences(vec![vec![7, 8, 9]], AlphabetSpec::None).unwrap();
    let json = serde_json::to_string(&aln).unwrap();
    let deserialized: Alignment = serde_json::from_str(&json).unwrap();

    assert_eq!(aln, deserialized);
    assert!(deserialized.alphabet().is_none());
}

#[test]
fn test_alignment_deserialization_rejects_bad_shape() {
    // Two codes cannot fill two sequences of length 4
    let json = r#"{"data":[0,1],"length":4,"alphabet":null,"weights":[0.5,0.5],"names":["a","b"]}"#;
    assert!(serde_json::from_str::<Alignment>(json).is_err());

    // Name count disagrees with the weight count
    let json = r#"{"data":[0,1,2,3],"length":2,"alphabet":null,"weights":[0.5,0.5],"names":["a"]}"#;
    assert!(serde_json::from_str::<Alignment>(json).is_err());

    // Zero-length sequences
    let json = r#"{"data":[],"length":0,"alphabet":null,"weights":[1.0],"names":["a"]}"#;
    assert!(serde_json::from_str::<Alignment>(json).is_err());
}

#[test]
fn test_alignment_deserialization_rejects_bad_weights() {
    let json = r#"{"data":[0,1,2,3],"length":2,"alphabet":null,"weights":[0.5,0.1],"names":["a","b"]}"#;
    assert!(serde_json::from_str::<Alignment>(json).is_err());

    let json = r#"{"data":[0,1,2,3],"length":2,"alphabet":null,"weights":[1.5,-0.5],"names":["a","b"]}"#;
    assert!(serde_json::from_str::<Alignment>(json).is_err());
}

#[test]
fn test_alignment_deserialization_validates_codes() {
    // Code 9 is outside the ungapped DNA alphabet, which has no default
    let json = r#"{"data":[0,9],"length":1,"alphabet":{"symbols":"ACGT","default":null},"weights":[0.5,0.5],"names":["a","b"]}"#;
    assert!(serde_json::from_str::<Alignment>(json).is_err());

    // With a gapped alphabet the stray code is remapped to the gap
    let json = r#"{"data":[1,9],"length":1,"alphabet":{"symbols":"-ACGT","default":"-"},"weights":[0.5,0.5],"names":["a","b"]}"#;
    let aln: Alignment = serde_json::from_str(json).unwrap();
    assert_eq!(aln.sequence(1), &[0]);
}
