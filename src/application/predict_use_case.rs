// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the trained model and vocabulary, then answers "what does
// the model think each interior word of this sentence is?" —
// the same inspection the training log prints every few steps,
// on demand for an arbitrary sentence.

use anyhow::Result;

use crate::data::preprocessor::Preprocessor;
use crate::domain::prediction::PredictionReport;
use crate::domain::traits::WordPredictor;
use crate::infra::{checkpoint::CheckpointManager, vocab_store::{Vocab, VocabStore}};
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    vocab:      Vocab,
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let vocab      = VocabStore::new(&checkpoint_dir).load()?;
        let ckpt       = CheckpointManager::new(&checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt)?;
        Ok(Self { vocab, inferencer })
    }
}

impl WordPredictor for PredictUseCase {
    /// Clean the sentence the same way training sentences were
    /// cleaned, then run it through the model.
    fn predict(&self, sentence: &str) -> Result<PredictionReport> {
        let clean = Preprocessor::new().clean(sentence);
        self.inferencer.predict(&clean, &self.vocab)
    }
}
