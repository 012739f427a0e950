// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the thin tensor shims in data/batcher.rs.
//
// What's in this layer:
//
//   model.rs      — The bidirectional LSTM architecture
//                   • Word embedding table (zero id = padding)
//                   • Forward stacked LSTM (left-to-right)
//                   • Backward stacked LSTM (right-to-left)
//                   • Joint projection head over both directions
//                   • Masked cross-entropy loss
//
//   trainer.rs    — The training driver
//                   Handles batch sampling, forward pass, loss,
//                   backward pass, clipped Adam updates, periodic
//                   prediction printouts, and the terminal
//                   checkpoint save
//
//   inferencer.rs — The prediction engine
//                   Loads a checkpoint, encodes a sentence,
//                   runs the model, decodes per-position words
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM
//            Peters et al. (2018) Deep contextualized word
//            representations

/// Bidirectional LSTM language-model architecture
pub mod model;

/// Training driver with sampling, logging, and checkpointing
pub mod trainer;

/// Prediction engine — loads checkpoint and predicts words
pub mod inferencer;
