// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's DefaultRecorder.
//
// What gets saved:
//   1. Model weights (model.mpk) — all learned parameters,
//      written once when training finishes
//   2. train_config.json         — model architecture config
//
// Why save the config separately?
//   When loading for prediction, we need to know the exact
//   model architecture (units, emb_dim, n_layers, vocab size)
//   to rebuild the model before loading the weights into it.
//
// Burn's DefaultRecorder:
//   - Serialises model parameters to MessagePack format
//   - Full precision, so a reloaded model reproduces the
//     trained model's logits exactly (CompactRecorder stores
//     half precision and would not)
//   - Type-safe: loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{DefaultRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::BiLmModel;

/// Name of the weights file, without the recorder's extension
const MODEL_FILE: &str = "model";

/// Manages saving and loading of the terminal model checkpoint.
pub struct CheckpointManager {
    /// Directory where checkpoint files are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        // create_dir_all creates parent directories too, like `mkdir -p`
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save the trained model's weights.
    ///
    /// Uses Burn's DefaultRecorder which:
    ///   1. Calls model.into_record() to extract all parameters
    ///   2. Serialises to MessagePack binary format
    ///   3. Writes to {dir}/model (recorder adds its extension)
    pub fn save_model<B: AutodiffBackend>(&self, model: &BiLmModel<B>) -> Result<()> {
        let path = self.dir.join(MODEL_FILE);

        DefaultRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint to '{}'", path.display());
        Ok(())
    }

    /// Load model weights from the saved checkpoint.
    ///
    /// The model parameter must have the correct architecture
    /// (matching the saved checkpoint) or loading will fail.
    pub fn load_model<B: Backend>(
        &self,
        model:  BiLmModel<B>,
        device: &B::Device,
    ) -> Result<BiLmModel<B>> {
        let path = self.dir.join(MODEL_FILE);

        let record = DefaultRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        // load_record() returns a new model with the loaded weights
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    ///
    /// This must be called before training starts so the predict
    /// command can reconstruct the exact model architecture.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Make sure you have run 'train' before 'predict'.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::BiLmConfig;
    use burn::module::AutodiffModule;

    type AutoBackend  = burn::backend::Autodiff<burn::backend::NdArray>;
    type InferBackend = burn::backend::NdArray;

    fn temp_dir(name: &str) -> String {
        let dir = std::env::temp_dir()
            .join(format!("bilm-checkpoint-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir.to_string_lossy().into_owned()
    }

    /// Saving then reloading parameters must reproduce identical
    /// logits for the same input (inference runs without dropout or
    /// any other stochastic layer, so bitwise-close is expected).
    #[test]
    fn test_save_then_load_reproduces_logits() {
        let device = Default::default();
        let cfg = BiLmConfig::new(6, 8, 6, 2);
        let trained = cfg.init::<AutoBackend>(&device);

        let ckpt = CheckpointManager::new(temp_dir("roundtrip"));
        ckpt.save_model(&trained).unwrap();

        // A fresh model has different random weights until the record
        // is loaded into it
        let fresh  = cfg.init::<InferBackend>(&device);
        let loaded = ckpt.load_model(fresh, &device).unwrap();

        let input = Tensor::<InferBackend, 1, Int>::from_ints(
            [2, 4, 5, 3].as_slice(), &device,
        ).reshape([1, 4]);

        let expected = trained.valid().forward(input.clone());
        let restored = loaded.forward(input);
        restored.into_data().assert_approx_eq(&expected.into_data(), 4);
    }

    #[test]
    fn test_config_round_trip() {
        use crate::application::train_use_case::TrainConfig;

        let ckpt = CheckpointManager::new(temp_dir("config"));
        let cfg = TrainConfig { vocab_size: 321, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();

        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.vocab_size, 321);
        assert_eq!(loaded.units, cfg.units);
    }
}
