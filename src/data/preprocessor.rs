// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw sentence text before tokenisation.
//
// Corpus files dragged through the web often contain:
//   - Non-breaking spaces (U+00A0) and zero-width spaces (U+200B)
//   - Carriage returns from Windows line endings
//   - Control characters
//   - Punctuation stuck to words ("said," / "end.")
//
// The vocabulary is word-level, so punctuation left attached to a
// word would create a separate vocab entry ("cat" vs "cat,") and
// waste vocabulary space. Cleaning maps every non-alphanumeric
// character except apostrophes to a space and collapses the runs.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one raw sentence for downstream tokenisation.
    /// Takes a &str and returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars() {
            // Keep letters, digits and in-word apostrophes; everything
            // else (punctuation, control chars, exotic whitespace)
            // becomes a single space
            let keep = c.is_alphanumeric() || c == '\'';
            if keep {
                out.push(c);
                last_space = false;
            } else if !last_space {
                out.push(' ');
                last_space = true;
            }
        }

        // Trim the trailing space a sentence-final period leaves behind
        out.trim_end().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("The cat sat, briefly."), "The cat sat briefly");
    }

    #[test]
    fn test_collapses_whitespace_runs() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
        assert_eq!(p.clean("hello\u{00A0}\u{200B}world"), "hello world");
    }

    #[test]
    fn test_keeps_apostrophes() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("don't stop"), "don't stop");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
