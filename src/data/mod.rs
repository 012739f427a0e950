// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw corpus files all the
// way to tensor batches.
//
// The pipeline flows in this order:
//
//   .tsv / .txt files
//       │
//       ▼
//   CorpusLoader      → reads files, extracts raw sentences
//       │
//       ▼
//   Preprocessor      → cleans text (whitespace, punctuation)
//       │
//       ▼
//   Vocab             → converts words to token ID numbers
//       │
//       ▼
//   SentenceDataset   → fixed-length id rows + sample(batch_size)
//       │
//       ▼
//   LmBatcher         → stacks sampled rows into a [B, T] tensor
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads sentence-pair files from a directory
pub mod loader;

/// Cleans and normalises raw sentence text
pub mod preprocessor;

/// Fixed-length id rows and random batch sampling
pub mod dataset;

/// Stacks sampled rows into integer tensor batches
pub mod batcher;
