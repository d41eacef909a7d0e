use textlens_core::tokenizer::tokenize;
use textlens_core::{build_analysis_record, clean, Language, StopWordSets};

#[test]
fn it_cleans_then_filters_stopwords() {
    let sets = StopWordSets::default();
    let words = tokenize(&clean("The quick brown fox and the lazy dog"), &Language::English, &sets);
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"fox".to_string()));
}

#[test]
fn records_never_keep_stop_words_of_their_language() {
    let sets = StopWordSets::default();
    let texts = [
        "The cat sat on the mat while the dog slept by the door.",
        "El perro y el gato de la casa con su amigo, y el niño pequeño.",
        "Le chat et le chien de la maison, il dort dans le jardin avec un ami.",
    ];
    for text in texts {
        let record = build_analysis_record("t", text).unwrap();
        let stops = sets.for_language(record.language());
        assert!(record.words().iter().all(|w| !stops.contains(w) && w.len() > 1), "{text}");
    }
}
