// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads sentences from a directory of corpus files.
//
// Two file shapes are understood:
//
//   *.tsv — paraphrase-corpus format: tab-separated columns where
//           the LAST TWO columns of each data line are the two
//           sentences of a pair. A header line (first column not
//           numeric) is skipped. Both sentences are kept as
//           independent training rows.
//
//   *.txt — one sentence per line.
//
// Loading stops after `max_rows` data lines so a large corpus
// file doesn't blow up a quick training run.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::sentence::Sentence;
use crate::domain::traits::SentenceSource;

/// Loads sentence-pair and plain-text files from a directory.
/// Implements the SentenceSource trait from Layer 3.
pub struct CorpusLoader {
    /// Path to the directory containing corpus files
    dir: String,

    /// Maximum number of data lines to read across all files
    max_rows: usize,
}

impl CorpusLoader {
    pub fn new(dir: impl Into<String>, max_rows: usize) -> Self {
        Self { dir: dir.into(), max_rows }
    }
}

impl SentenceSource for CorpusLoader {
    fn load_all(&self) -> Result<Vec<Sentence>> {
        let dir = Path::new(&self.dir);

        // If the directory doesn't exist, return empty rather than crashing —
        // the caller decides whether an empty corpus is fatal.
        if !dir.exists() {
            tracing::warn!(
                "Corpus directory '{}' does not exist — returning empty corpus",
                self.dir
            );
            return Ok(Vec::new());
        }

        // Collect and sort entries so row capping is deterministic
        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("tsv") | Some("txt")
                )
            })
            .collect();
        paths.sort();

        let mut sentences = Vec::new();
        let mut rows = 0usize;

        for path in &paths {
            match load_single_file(path, self.max_rows - rows, &mut sentences) {
                Ok(n) => {
                    tracing::debug!("Loaded {} rows from '{}'", n, path.display());
                    rows += n;
                }
                // Log a warning but continue — don't fail on one bad file
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", path.display(), e);
                }
            }
            if rows >= self.max_rows {
                break;
            }
        }

        tracing::info!("Loaded {} sentences ({} corpus rows)", sentences.len(), rows);
        Ok(sentences)
    }
}

/// Parse one corpus file, appending sentences until `budget` data
/// lines have been consumed. Returns the number of lines used.
fn load_single_file(
    path:      &Path,
    budget:    usize,
    sentences: &mut Vec<Sentence>,
) -> Result<usize> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let mut rows = 0usize;

    for line in body.lines() {
        if rows >= budget {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.contains('\t') {
            let fields: Vec<&str> = line.split('\t').collect();

            // Header line: first column is not a number (e.g. "Quality")
            if fields[0].parse::<u32>().is_err() {
                continue;
            }

            // The two sentences are the last two columns
            if fields.len() >= 2 {
                for &sent in &fields[fields.len() - 2..] {
                    let sent = sent.trim();
                    if !sent.is_empty() {
                        sentences.push(Sentence::new(source.clone(), sent));
                    }
                }
                rows += 1;
            }
        } else {
            sentences.push(Sentence::new(source.clone(), line));
            rows += 1;
        }
    }

    Ok(rows)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn write_corpus(name: &str, files: &[(&str, &str)]) -> String {
        let dir = std::env::temp_dir().join(format!("bilm-loader-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        for (file, body) in files {
            std::fs::write(dir.join(file), body).unwrap();
        }
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_tsv_takes_last_two_columns_and_skips_header() {
        let dir = write_corpus(
            "tsv",
            &[(
                "pairs.tsv",
                "Quality\t#1 ID\t#2 ID\t#1 String\t#2 String\n\
                 1\t100\t101\tthe cat sat\ta cat was sitting\n\
                 0\t102\t103\tdogs bark loudly\tthe sky is blue\n",
            )],
        );
        let sentences = CorpusLoader::new(dir, 1000).load_all().unwrap();
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["the cat sat", "a cat was sitting", "dogs bark loudly", "the sky is blue"]
        );
    }

    #[test]
    fn test_txt_is_one_sentence_per_line() {
        let dir = write_corpus("txt", &[("lines.txt", "first sentence\n\nsecond sentence\n")]);
        let sentences = CorpusLoader::new(dir, 1000).load_all().unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].source, "lines.txt");
    }

    #[test]
    fn test_max_rows_caps_loading() {
        let dir = write_corpus(
            "cap",
            &[("pairs.tsv", "1\ta b\tc d\n1\te f\tg h\n1\ti j\tk l\n")],
        );
        let sentences = CorpusLoader::new(dir, 2).load_all().unwrap();
        // 2 rows × 2 sentences each
        assert_eq!(sentences.len(), 4);
    }

    #[test]
    fn test_missing_directory_returns_empty() {
        let sentences = CorpusLoader::new("/nonexistent/bilm-corpus", 10)
            .load_all()
            .unwrap();
        assert!(sentences.is_empty());
    }
}
