// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::domain::prediction::{PredictionReport, TokenPrediction};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::vocab_store::{Vocab, BOS_ID, EOS_ID};
use crate::ml::model::{BiLmConfig, BiLmModel};

type InferBackend = burn::backend::NdArray;

pub struct Inferencer {
    model:  BiLmModel<InferBackend>,
    device: burn::backend::ndarray::NdArrayDevice,
}

impl Inferencer {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let cfg    = ckpt_manager.load_config()?;
        let model_cfg = BiLmConfig::new(cfg.vocab_size, cfg.emb_dim, cfg.units, cfg.n_layers);
        let model: BiLmModel<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Predict every interior word of a cleaned sentence from its
    /// two-sided context. The sequence length is whatever the
    /// sentence needs — the recurrent stacks don't care about the
    /// length used during training.
    pub fn predict(&self, sentence: &str, vocab: &Vocab) -> Result<PredictionReport> {
        // Frame the sentence the way training rows are framed
        let mut ids: Vec<u32> = vec![BOS_ID as u32];
        ids.extend(vocab.encode(sentence)?);
        ids.push(EOS_ID as u32);

        if ids.len() < 3 {
            anyhow::bail!("sentence has no interior words to predict");
        }
        let seq_len = ids.len();

        // Forward pass
        let flat: Vec<i32> = ids.iter().map(|&x| x as i32).collect();
        let tokens = Tensor::<InferBackend, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([1, seq_len]);

        let logits = self.model.forward(tokens); // [1, seq_len-2, vocab]

        // Top-1 decode per interior position
        let positions = seq_len - 2;
        let pred_ids: Vec<i64> = logits
            .argmax(2)
            .reshape([positions])
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap_or_default();

        let predictions: Vec<TokenPrediction> = ids[1..seq_len - 1]
            .iter()
            .zip(pred_ids.iter())
            .enumerate()
            .map(|(i, (&target, &pred))| TokenPrediction {
                position:  i + 1,
                target:    vocab.word(target as usize).to_string(),
                predicted: vocab.word(pred as usize).to_string(),
            })
            .collect();

        tracing::debug!(
            "Predicted {} interior positions for a {}-token sequence",
            predictions.len(),
            seq_len,
        );
        Ok(PredictionReport::new(predictions))
    }
}
