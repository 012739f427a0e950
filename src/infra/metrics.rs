// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file at each logged step.
//
// Metrics recorded per logged step:
//   - step:    the driver iteration number (0, 50, 100, ...)
//   - loss:    masked cross-entropy loss of that step's batch
//   - seconds: wall-clock time since the previous logged step
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   step,loss,seconds
//   0,9.210341,0.04
//   50,7.804512,1.93
//   ...
//
// Loss should trend downward over steps; a flat or rising curve
// means the learning rate or the clip threshold needs a look.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single logged training step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepMetrics {
    /// The driver iteration this row was logged at
    pub step: usize,

    /// Batch loss at this step. Lower is better; random
    /// initialisation gives ~ln(vocab_size)
    pub loss: f64,

    /// Wall-clock seconds elapsed since the previous logged step
    pub seconds: f64,
}

impl StepMetrics {
    pub fn new(step: usize, loss: f64, seconds: f64) -> Self {
        Self { step, loss, seconds }
    }

    /// Returns true if this step improved over the previous best loss
    pub fn is_improvement(&self, best_loss: f64) -> bool {
        self.loss < best_loss
    }
}

/// Logs step metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write the header only if the file is new — this allows
        // appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "step,loss,seconds")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one step's metrics as a new row in the CSV.
    pub fn log(&self, m: &StepMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{:.2}", m.step, m.loss, m.seconds)?;

        tracing::debug!("Logged step {} metrics: loss={:.4}", m.step, m.loss);
        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = StepMetrics::new(50, 2.3, 1.8);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_log_appends_rows() {
        let dir = std::env::temp_dir().join(format!("bilm-metrics-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();

        let logger = MetricsLogger::new(dir.to_string_lossy().into_owned()).unwrap();
        logger.log(&StepMetrics::new(0, 9.21, 0.04)).unwrap();
        logger.log(&StepMetrics::new(50, 7.80, 1.93)).unwrap();

        let body = std::fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "step,loss,seconds");
        assert!(lines[1].starts_with("0,9.21"));
        assert!(lines[2].starts_with("50,7.8"));
    }
}
