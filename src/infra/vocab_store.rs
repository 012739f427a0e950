// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Manages vocabulary building, saving, and loading.
//
// In tokenizers 0.15, train_from_files requires Trainer::Model
// to equal ModelWrapper. The correct approach for a word-level
// vocabulary is to build the tokenizer JSON manually and load
// it, bypassing the trainer type mismatch entirely.
//
// The id layout is fixed:
//   [PAD]=0  — padding / mask sentinel (must be 0: the model
//              derives its mask and loss mask from id == 0)
//   [UNK]=1  — out-of-vocabulary words
//   [BOS]=2  — prepended to every sentence
//   [EOS]=3  — appended to every sentence
//   4..      — corpus words, most frequent first

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::Tokenizer;

pub const PAD_ID: usize = 0;
pub const UNK_ID: usize = 1;
pub const BOS_ID: usize = 2;
pub const EOS_ID: usize = 3;

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const BOS_TOKEN: &str = "[BOS]";
pub const EOS_TOKEN: &str = "[EOS]";

/// Number of reserved special-token ids before corpus words start
const RESERVED: usize = 4;

// ─── Vocab ────────────────────────────────────────────────────────────────────
/// A loaded vocabulary: word→id encoding via the tokenizers crate
/// plus the id→word table the training log and predict command use.
pub struct Vocab {
    tokenizer: Tokenizer,
    i2v:       Vec<String>,
}

impl Vocab {
    fn from_tokenizer(tokenizer: Tokenizer) -> Self {
        // Invert the word→id map into a dense id→word table.
        // Ids are contiguous by construction, so the table has no holes.
        let v2i = tokenizer.get_vocab(true);
        let size = v2i.values().map(|&id| id as usize + 1).max().unwrap_or(0);
        let mut i2v = vec![String::new(); size];
        for (word, id) in v2i {
            i2v[id as usize] = word;
        }
        Self { tokenizer, i2v }
    }

    /// Total number of ids, special tokens included.
    /// Fixes the embedding table's first dimension and the
    /// projection head's output dimension.
    pub fn vocab_size(&self) -> usize {
        self.i2v.len()
    }

    /// Encode a cleaned sentence into word ids (no [BOS]/[EOS] wrapping —
    /// the caller decides how to frame the sequence).
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(enc.get_ids().to_vec())
    }

    /// The index-to-word mapping. Unknown ids map to [UNK].
    pub fn word(&self, id: usize) -> &str {
        self.i2v.get(id).map(String::as_str).unwrap_or(UNK_TOKEN)
    }
}

// ─── VocabStore ───────────────────────────────────────────────────────────────
pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Load an existing vocabulary or build a new one from sentences
    pub fn load_or_build(
        &self,
        sentences: &[String],
        max_vocab: usize,
    ) -> Result<Vocab> {
        let path = self.dir.join("vocab.json");
        if path.exists() {
            tracing::info!("Loading existing vocabulary from disk");
            self.load()
        } else {
            tracing::info!("Building new vocabulary (max_vocab={})", max_vocab);
            self.build_and_save(sentences, max_vocab)
        }
    }

    /// Load a previously saved vocabulary from its tokenizer JSON
    pub fn load(&self) -> Result<Vocab> {
        let path = self.dir.join("vocab.json");
        let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load vocabulary from '{}': {}", path.display(), e)
        })?;
        Ok(Vocab::from_tokenizer(tokenizer))
    }

    /// Count word frequencies over the cleaned sentences and write a
    /// word-level tokenizer JSON directly — the format that
    /// Tokenizer::from_file() expects.
    fn build_and_save(&self, sentences: &[String], max_vocab: usize) -> Result<Vocab> {
        std::fs::create_dir_all(&self.dir).ok();

        // ── Step 1: Count word frequencies ────────────────────────────────────
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in sentences {
            for word in text.split_whitespace() {
                let w = word.to_lowercase();
                if !w.is_empty() {
                    *freq.entry(w).or_insert(0) += 1;
                }
            }
        }

        // Sort by frequency descending (ties broken alphabetically so the
        // id assignment is stable across runs), keep the top entries
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(max_vocab.saturating_sub(RESERVED));

        // ── Step 2: Assign contiguous ids after the specials ──────────────────
        let mut vocab = serde_json::Map::new();
        vocab.insert(PAD_TOKEN.to_string(), serde_json::json!(PAD_ID));
        vocab.insert(UNK_TOKEN.to_string(), serde_json::json!(UNK_ID));
        vocab.insert(BOS_TOKEN.to_string(), serde_json::json!(BOS_ID));
        vocab.insert(EOS_TOKEN.to_string(), serde_json::json!(EOS_ID));

        let mut next_id = RESERVED;
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                vocab.insert(word.clone(), serde_json::json!(next_id));
                next_id += 1;
            }
        }

        // ── Step 3: Write the tokenizer JSON ──────────────────────────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PAD_ID, "content": PAD_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": UNK_ID, "content": UNK_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": BOS_ID, "content": BOS_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": EOS_ID, "content": EOS_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "Lowercase"
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK_TOKEN
            }
        });

        let path = self.dir.join("vocab.json");
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;

        tracing::info!(
            "Vocabulary built with {} entries, saved to '{}'",
            next_id,
            path.display()
        );

        // Load back as a proper Tokenizer instance
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot reload vocabulary: {e}"))?;
        Ok(Vocab::from_tokenizer(tokenizer))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("bilm-vocab-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_build_assigns_special_ids() {
        let store = VocabStore::new(temp_dir("specials"));
        let sentences = vec!["the cat sat".to_string(), "the dog ran".to_string()];
        let vocab = store.load_or_build(&sentences, 100).unwrap();

        assert_eq!(vocab.word(PAD_ID), PAD_TOKEN);
        assert_eq!(vocab.word(UNK_ID), UNK_TOKEN);
        assert_eq!(vocab.word(BOS_ID), BOS_TOKEN);
        assert_eq!(vocab.word(EOS_ID), EOS_TOKEN);
        // 4 specials + {the, cat, sat, dog, ran}
        assert_eq!(vocab.vocab_size(), 9);
    }

    #[test]
    fn test_encode_round_trips_words() {
        let store = VocabStore::new(temp_dir("encode"));
        let sentences = vec!["the cat sat".to_string()];
        let vocab = store.load_or_build(&sentences, 100).unwrap();

        let ids = vocab.encode("the cat sat").unwrap();
        assert_eq!(ids.len(), 3);
        let words: Vec<&str> = ids.iter().map(|&id| vocab.word(id as usize)).collect();
        assert_eq!(words, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn test_unknown_word_maps_to_unk() {
        let store = VocabStore::new(temp_dir("unk"));
        let sentences = vec!["the cat sat".to_string()];
        let vocab = store.load_or_build(&sentences, 100).unwrap();

        let ids = vocab.encode("the zebra sat").unwrap();
        assert_eq!(ids[1] as usize, UNK_ID);
    }

    #[test]
    fn test_max_vocab_caps_word_count() {
        let store = VocabStore::new(temp_dir("cap"));
        // "the" is most frequent so it must survive the cap
        let sentences = vec!["the the the cat dog bird fish".to_string()];
        let vocab = store.load_or_build(&sentences, 6).unwrap();

        // 4 specials + 2 words
        assert_eq!(vocab.vocab_size(), 6);
        let ids = vocab.encode("the").unwrap();
        assert_ne!(ids[0] as usize, UNK_ID);
    }

    #[test]
    fn test_load_reuses_saved_vocab() {
        let dir = temp_dir("reload");
        let sentences = vec!["alpha beta gamma".to_string()];
        let built = VocabStore::new(dir.clone()).load_or_build(&sentences, 100).unwrap();

        // Second load must not rebuild — pass a different corpus and check
        // the original mapping is returned.
        let other = vec!["delta epsilon".to_string()];
        let loaded = VocabStore::new(dir).load_or_build(&other, 100).unwrap();
        assert_eq!(loaded.vocab_size(), built.vocab_size());
        assert_eq!(loaded.encode("alpha").unwrap(), built.encode("alpha").unwrap());
    }
}
