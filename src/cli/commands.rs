// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the bidirectional language model on a sentence corpus
    Train(TrainArgs),

    /// Predict the interior words of a sentence from a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line; the defaults
/// are the intended research setup, so a bare `train` works.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing .tsv sentence-pair / .txt corpus files
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory to save the checkpoint, vocabulary, and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of corpus data lines to read
    #[arg(long, default_value_t = 1000)]
    pub max_rows: usize,

    /// Maximum tokens per row, [BOS]/[EOS] frame included —
    /// longer sentences are truncated
    #[arg(long, default_value_t = 40)]
    pub max_seq_len: usize,

    /// Number of rows sampled together in one training step
    #[arg(long, default_value_t = 12)]
    pub batch_size: usize,

    /// Number of training steps (one sampled batch each)
    #[arg(long, default_value_t = 2500)]
    pub steps: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    /// Width of each word-embedding vector
    #[arg(long, default_value_t = 128)]
    pub emb_dim: usize,

    /// Hidden width of every LSTM cell
    #[arg(long, default_value_t = 128)]
    pub units: usize,

    /// Number of stacked LSTM layers per direction
    #[arg(long, default_value_t = 2)]
    pub n_layers: usize,

    /// Print loss and a sample prediction every N steps
    #[arg(long, default_value_t = 50)]
    pub log_every: usize,

    /// Maximum vocabulary size, special tokens included
    #[arg(long, default_value_t = 10000)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_dir:     a.corpus_dir,
            checkpoint_dir: a.checkpoint_dir,
            max_rows:       a.max_rows,
            max_seq_len:    a.max_seq_len,
            batch_size:     a.batch_size,
            steps:          a.steps,
            lr:             a.lr,
            emb_dim:        a.emb_dim,
            units:          a.units,
            n_layers:       a.n_layers,
            log_every:      a.log_every,
            vocab_size:     a.vocab_size,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// The sentence whose interior words should be predicted
    #[arg(long)]
    pub sentence: String,

    /// Directory where the checkpoint was saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
