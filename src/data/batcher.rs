// ============================================================
// Layer 4 — Language-Model Batcher
// ============================================================
// Converts a Vec<LmSample> into a tensor batch.
//
// How batching works here:
//   Input:  Vec of N LmSamples, each with a row of length T
//   Output: LmBatch with a token tensor of shape [N, T]
//
//   All token ids are flattened into one long Vec, then reshaped:
//   [r1_t1, r1_t2, ..., r1_tT, r2_t1, ..., rN_tT] → [N, T]
//
// This is easy because every row is already padded to the same
// length by the dataset builder. The padding mask is NOT built
// here — the model derives it from `id == [PAD]` so that forward
// passes on hand-made tensors (tests, the predict command) mask
// identically.
//
// Reference: Burn Book §4 (Batcher)

use burn::prelude::*;

use crate::data::dataset::LmSample;

// ─── LmBatch ──────────────────────────────────────────────────────────────────
/// A batch of training rows ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct LmBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub tokens: Tensor<B, 2, Int>,
}

// ─── LmBatcher ────────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created where the
/// model's parameters live.
#[derive(Clone, Debug)]
pub struct LmBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> LmBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack sampled rows into a single [batch, seq_len] Int tensor.
    /// Called directly by the training driver after each
    /// `dataset.sample(batch_size)`.
    pub fn batch(&self, items: Vec<LmSample>) -> LmBatch<B> {
        let batch_size = items.len();
        // All rows have the same length (pre-padded)
        let seq_len    = items[0].token_ids.len();

        // Flatten Vec<Vec<u32>> to Vec<i32> (Burn uses signed ints
        // for Int tensors)
        let flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.token_ids.iter().map(|&x| x as i32))
            .collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        LmBatch { tokens }
    }
}
