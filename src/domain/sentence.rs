// ============================================================
// Layer 3 — Sentence Domain Type
// ============================================================
// Represents a single sentence taken from the corpus.
// This is a plain data struct with no behaviour —
// just a source name and the sentence text.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One raw sentence from the corpus.
/// By the time a Sentence is created, the text has already been
/// pulled out of whatever file format it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    /// The filename the sentence came from — kept for traceability
    pub source: String,

    /// The sentence text before cleaning or tokenisation
    pub text: String,
}

impl Sentence {
    /// Create a new Sentence with a source name and text.
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }

    /// Number of whitespace-separated words in the sentence
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        let s = Sentence::new("pairs.tsv", "the cat sat on the mat");
        assert_eq!(s.word_count(), 6);
    }
}
