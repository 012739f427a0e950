// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CorpusLoader implements SentenceSource
//   - A future database-backed loader could also implement it
//   - The application layer only sees SentenceSource
//     and works with both without any changes
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::prediction::PredictionReport;
use crate::domain::sentence::Sentence;

// ─── SentenceSource ───────────────────────────────────────────────────────────
/// Any component that can produce the raw sentences of a corpus.
///
/// Implementations:
///   - CorpusLoader → reads a directory of .tsv/.txt files
pub trait SentenceSource {
    /// Load all available sentences from this source.
    fn load_all(&self) -> Result<Vec<Sentence>>;
}

// ─── WordPredictor ────────────────────────────────────────────────────────────
/// Any component that can predict the interior words of a sentence
/// from their surrounding context.
///
/// Implementations:
///   - PredictUseCase → uses the trained bidirectional LSTM
pub trait WordPredictor {
    /// Given a sentence, return the model's per-position predictions.
    fn predict(&self, sentence: &str) -> Result<PredictionReport>;
}
