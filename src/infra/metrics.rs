// ============================================================
// Layer 6 — Evaluation Metrics Logger
// ============================================================
// Records one row per `evaluate` run in a CSV file so accuracy
// can be compared across checkpoints and ensemble settings.
//
// Columns:
//   model          checkpoint directory
//   members        ensemble members used, e.g. "rnn+cnn"
//   total          records scored
//   correct        records whose prediction matched the label
//   disambiguated  records re-judged by the pair model
//   accuracy       correct / total, in [0, 1]
//
// Example:
//   model,members,total,correct,disambiguated,accuracy
//   models/ntc,rnn+cnn,1200,1014,37,0.845000
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// Outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    pub model:         String,
    pub members:       String,
    pub total:         usize,
    pub correct:       usize,
    pub disambiguated: usize,
}

impl EvaluationMetrics {
    /// Fraction of records predicted correctly. 0.0 for an empty run.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// Whole-number percentage, truncated toward zero.
    pub fn accuracy_percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            100 * self.correct / self.total
        }
    }
}

/// Appends evaluation rows to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header only if the file doesn't exist yet.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();

        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "model,members,total,correct,disambiguated,accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EvaluationMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{},{},{:.6}",
            m.model,
            m.members,
            m.total,
            m.correct,
            m.disambiguated,
            m.accuracy(),
        )?;

        tracing::debug!("Logged metrics for '{}': accuracy={:.4}", m.model, m.accuracy());
        Ok(())
    }
}
