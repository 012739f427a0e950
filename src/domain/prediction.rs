// ============================================================
// Layer 3 — Prediction Domain Types
// ============================================================
// Represents what the bidirectional language model produces for
// one sentence: a predicted word for every interior position.
//
// A position is "interior" when the model has seen context on
// both sides of it — the first and last token of a sequence can
// never be predicted from both directions, so they carry no
// prediction.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// The model's guess for a single interior position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPrediction {
    /// Position of the token in the full input sequence
    pub position: usize,

    /// The word that actually appears at this position
    pub target: String,

    /// The word the model predicted from left + right context
    pub predicted: String,
}

impl TokenPrediction {
    pub fn is_correct(&self) -> bool {
        self.target == self.predicted
    }
}

/// All per-position predictions for one sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub tokens: Vec<TokenPrediction>,
}

impl PredictionReport {
    pub fn new(tokens: Vec<TokenPrediction>) -> Self {
        Self { tokens }
    }

    /// Ground-truth words, space-joined — mirrors the `tgt:` training log line
    pub fn target_line(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.target.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Predicted words, space-joined — mirrors the `prd:` training log line
    pub fn predicted_line(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.predicted.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fraction of interior positions predicted exactly right.
    /// Range [0.0, 1.0]; 0.0 for an empty report.
    pub fn accuracy(&self) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let correct = self.tokens.iter().filter(|t| t.is_correct()).count();
        correct as f64 / self.tokens.len() as f64
    }
}
