use burn::data::dataset::Dataset;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::infra::vocab_store::PAD_ID;

/// One fully encoded and padded training row.
/// Sequence format: [BOS] words... [EOS] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LmSample {
    pub token_ids: Vec<u32>,
}

impl LmSample {
    pub fn new(token_ids: Vec<u32>) -> Self {
        Self { token_ids }
    }

    /// Sequence length before the padding tail starts
    pub fn content_len(&self) -> usize {
        self.token_ids
            .iter()
            .position(|&id| id as usize == PAD_ID)
            .unwrap_or(self.token_ids.len())
    }
}

/// Fixed-shape training rows with random batch sampling.
/// Every row has the same length, so any subset stacks into a
/// rectangular batch without further padding.
pub struct SentenceDataset {
    rows:    Vec<LmSample>,
    seq_len: usize,
}

impl SentenceDataset {
    pub fn new(rows: Vec<LmSample>) -> Self {
        let seq_len = rows.first().map(|r| r.token_ids.len()).unwrap_or(0);
        debug_assert!(rows.iter().all(|r| r.token_ids.len() == seq_len));
        Self { rows, seq_len }
    }

    /// Length every row is padded to
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn sample_count(&self) -> usize {
        self.rows.len()
    }

    /// Draw `batch_size` rows uniformly at random, with replacement —
    /// the driver loop calls this once per training step.
    pub fn sample(&self, batch_size: usize) -> Vec<LmSample> {
        let mut rng = rand::thread_rng();
        (0..batch_size)
            .map(|_| self.rows[rng.gen_range(0..self.rows.len())].clone())
            .collect()
    }
}

impl Dataset<LmSample> for SentenceDataset {
    fn get(&self, index: usize) -> Option<LmSample> {
        self.rows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> SentenceDataset {
        SentenceDataset::new(vec![
            LmSample::new(vec![2, 5, 6, 3, 0]),
            LmSample::new(vec![2, 7, 3, 0, 0]),
            LmSample::new(vec![2, 8, 9, 4, 3]),
        ])
    }

    #[test]
    fn test_sample_has_requested_shape() {
        let ds = dataset();
        let batch = ds.sample(12);
        assert_eq!(batch.len(), 12);
        assert!(batch.iter().all(|s| s.token_ids.len() == ds.seq_len()));
    }

    #[test]
    fn test_content_len_stops_at_padding() {
        let ds = dataset();
        assert_eq!(ds.get(0).unwrap().content_len(), 4);
        assert_eq!(ds.get(1).unwrap().content_len(), 3);
        assert_eq!(ds.get(2).unwrap().content_len(), 5);
    }

    #[test]
    fn test_dataset_trait_len_and_get() {
        let ds = dataset();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sample_count(), 3);
        assert!(ds.get(2).is_some());
        assert!(ds.get(3).is_none());
    }
}
