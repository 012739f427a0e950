// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   vocab_store.rs — Vocabulary persistence
//                    Builds a word-level vocabulary from the
//                    corpus if none exists, or loads a
//                    previously saved one. Ensures the same
//                    word↔id mapping is used for training
//                    and prediction.
//
//   checkpoint.rs  — Saving and loading model weights
//                    Uses Burn's DefaultRecorder to serialise
//                    model parameters to disk. Also saves and
//                    loads the TrainConfig as JSON so the
//                    predict command can rebuild the model.
//
//   metrics.rs     — Training metrics logging
//                    Writes step-level metrics (loss, wall
//                    clock) to a CSV file for later analysis.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Vocabulary building, saving, and loading
pub mod vocab_store;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
