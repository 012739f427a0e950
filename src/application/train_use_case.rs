// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load corpus sentences    (Layer 4 - data)
//   Step 2: Clean the text           (Layer 4 - data)
//   Step 3: Build / load vocabulary  (Layer 6 - infra)
//   Step 4: Encode fixed-length rows (Layer 4 - data)
//   Step 5: Save resolved config     (Layer 6 - infra)
//   Step 6: Run the training driver  (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{LmSample, SentenceDataset},
    loader::CorpusLoader,
    preprocessor::Preprocessor,
};
use crate::domain::traits::SentenceSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    vocab_store::{Vocab, VocabStore, BOS_ID, EOS_ID, PAD_ID},
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for the
// predict command. The defaults are the intended research setup —
// running `train` with no flags reproduces them exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_dir:     String,
    pub checkpoint_dir: String,
    pub max_rows:       usize,
    pub max_seq_len:    usize,
    pub batch_size:     usize,
    pub steps:          usize,
    pub lr:             f64,
    pub emb_dim:        usize,
    pub units:          usize,
    pub n_layers:       usize,
    pub log_every:      usize,
    pub vocab_size:     usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_dir:     "data/corpus".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            max_rows:       1000,
            max_seq_len:    40,
            batch_size:     12,
            steps:          2500,
            lr:             1e-4,
            emb_dim:        128,
            units:          128,
            n_layers:       2,
            log_every:      50,
            vocab_size:     10000,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load corpus sentences ─────────────────────────────────────
        tracing::info!("Loading corpus files from '{}'", cfg.corpus_dir);
        let loader = CorpusLoader::new(&cfg.corpus_dir, cfg.max_rows);
        let raw    = loader.load_all()?;
        anyhow::ensure!(
            !raw.is_empty(),
            "No sentences found in '{}' — nothing to train on",
            cfg.corpus_dir
        );

        // ── Step 2: Clean / normalise text ────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let clean: Vec<String> = raw
            .iter()
            .map(|s| preprocessor.clean(&s.text))
            .filter(|s| !s.is_empty())
            .collect();

        // ── Step 3: Build / load vocabulary ───────────────────────────────────
        // If a vocabulary was already built and saved, load it.
        // Otherwise count word frequencies over the corpus.
        let vocab_store = VocabStore::new(&cfg.checkpoint_dir);
        let vocab       = vocab_store.load_or_build(&clean, cfg.vocab_size)?;
        tracing::info!("Vocabulary size: {}", vocab.vocab_size());

        // ── Step 4: Encode fixed-length training rows ─────────────────────────
        let rows = build_lm_samples(&clean, &vocab, cfg.max_seq_len)?;
        anyhow::ensure!(!rows.is_empty(), "Corpus produced no usable training rows");

        let dataset = SentenceDataset::new(rows);
        tracing::info!(
            "Built {} training rows of length {}",
            dataset.sample_count(),
            dataset.seq_len(),
        );

        // ── Step 5: Save the resolved config for prediction ───────────────────
        // vocab_size flips from "cap" to "actual" here so the predict
        // command rebuilds the embedding and head at the right width
        let mut cfg = cfg.clone();
        cfg.vocab_size = vocab.vocab_size();

        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(&cfg)?;

        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 6: Run the training driver (Layer 5) ─────────────────────────
        run_training(&cfg, dataset, &vocab, ckpt_manager, metrics)?;

        Ok(())
    }
}

// ─── Row building ─────────────────────────────────────────────────────────────
/// Encode cleaned sentences into [BOS] words [EOS] id rows, then pad
/// every row with [PAD] to the corpus-wide maximum so any sampled
/// subset stacks into a rectangular batch.
fn build_lm_samples(
    sentences:   &[String],
    vocab:       &Vocab,
    max_seq_len: usize,
) -> Result<Vec<LmSample>> {
    // Room for the [BOS]/[EOS] frame
    let body_budget = max_seq_len.saturating_sub(2);

    let mut encoded: Vec<Vec<u32>> = Vec::new();
    for text in sentences {
        let mut ids = vocab.encode(text)?;
        ids.truncate(body_budget);
        // A row needs at least one interior word to predict
        if ids.is_empty() {
            continue;
        }

        let mut row = Vec::with_capacity(ids.len() + 2);
        row.push(BOS_ID as u32);
        row.extend(ids);
        row.push(EOS_ID as u32);
        encoded.push(row);
    }

    let seq_len = encoded.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut encoded {
        row.resize(seq_len, PAD_ID as u32);
    }

    Ok(encoded.into_iter().map(LmSample::new).collect())
}
