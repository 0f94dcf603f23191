// ============================================================
// Layer 2 — Ambiguity Use Case
// ============================================================
// Counts close calls: records whose two best classes are within
// `margin` of each other.
//
//   |p(top1) - p(top2)| <= margin   → close call
//
// Every close call increments a counter for each of the two
// classes and one for the ordered (top1, top2) pair. Counters
// are reported by descending count, then by name.

use std::collections::HashMap;

use anyhow::{bail, Result};
use burn::prelude::*;

use crate::application::config::InferConfig;
use crate::domain::prediction::Prediction;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::backend::{run_on_device, BackendTask};
use crate::ml::inferencer::Inferencer;

pub const DEFAULT_MARGIN: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct AmbiguityConfig {
    pub infer:  InferConfig,
    pub margin: f32,
}

impl AmbiguityConfig {
    pub fn validate(&self) -> Result<()> {
        self.infer.validate()?;
        if self.infer.top_k < 2 {
            bail!("ambiguity needs --top-k of at least 2");
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            bail!("--margin must be a non-negative number, got {}", self.margin);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbiguityReport {
    pub total:        usize,
    pub close_calls:  usize,
    pub class_counts: Vec<(String, usize)>,
    pub pair_counts:  Vec<((String, String), usize)>,
}

/// Tally close calls over a set of predictions.
pub fn count_close_calls(predictions: &[Prediction], margin: f32) -> AmbiguityReport {
    let mut classes: HashMap<String, usize> = HashMap::new();
    let mut pairs: HashMap<(String, String), usize> = HashMap::new();
    let mut close_calls = 0;

    for prediction in predictions {
        let (Some(second), Some(gap)) = (prediction.top2(), prediction.margin()) else {
            continue;
        };
        if gap > margin {
            continue;
        }
        close_calls += 1;

        let first = &prediction.top1().class;
        *classes.entry(first.clone()).or_default() += 1;
        *classes.entry(second.class.clone()).or_default() += 1;
        *pairs.entry((first.clone(), second.class.clone())).or_default() += 1;
    }

    AmbiguityReport {
        total: predictions.len(),
        close_calls,
        class_counts: sorted(classes),
        pair_counts:  sorted(pairs),
    }
}

fn sorted<K: Ord>(counts: HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut v: Vec<_> = counts.into_iter().collect();
    v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    v
}

pub struct AmbiguityUseCase {
    config: AmbiguityConfig,
}

impl AmbiguityUseCase {
    pub fn new(config: AmbiguityConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<AmbiguityReport> {
        self.config.validate()?;
        run_on_device(self.config.infer.gpu_id, self)
    }
}

impl BackendTask for &AmbiguityUseCase {
    type Output = AmbiguityReport;

    fn run<B: Backend>(self, device: B::Device) -> Result<AmbiguityReport> {
        let infer = &self.config.infer;
        let records = infer.load_records()?;

        let ckpt = CheckpointManager::new(&infer.model_fn);
        let inferencer = Inferencer::<B>::from_checkpoint(&ckpt, &infer.ensemble_options(), &device)?;
        let predictions = inferencer.predict(&records, infer.top_k)?;

        let report = count_close_calls(&predictions, self.config.margin);
        tracing::info!(
            "{} of {} records within margin {}",
            report.close_calls,
            report.total,
            self.config.margin
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::ScoredClass;
    use crate::test_support::{write_checkpoint, write_test_file};

    fn prediction(first: (&str, f32), second: (&str, f32)) -> Prediction {
        Prediction {
            ranked: [first, second]
                .iter()
                .map(|(class, prob)| ScoredClass {
                    class: class.to_string(),
                    prob:  *prob,
                })
                .collect(),
        }
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_margin_is_inclusive() {
        let preds = vec![
            prediction(("A", 0.5), ("B", 0.25)),
            prediction(("A", 0.5), ("B", 0.2)),
        ];
        let report = count_close_calls(&preds, 0.25);
        assert_eq!(report.total, 2);
        assert_eq!(report.close_calls, 1);
    }

    #[test]
    fn test_counts_are_sorted_by_count_then_name() {
        let preds = vec![
            prediction(("B", 0.45), ("A", 0.40)),
            prediction(("C", 0.45), ("A", 0.40)),
            prediction(("A", 0.45), ("C", 0.40)),
            prediction(("A", 0.90), ("B", 0.05)),
        ];
        let report = count_close_calls(&preds, DEFAULT_MARGIN);
        assert_eq!(report.close_calls, 3);
        assert_eq!(
            report.class_counts,
            vec![("A".to_string(), 3), ("C".to_string(), 2), ("B".to_string(), 1)]
        );
        assert_eq!(
            report.pair_counts,
            vec![(pair("A", "C"), 1), (pair("B", "A"), 1), (pair("C", "A"), 1)]
        );
    }

    #[test]
    fn test_single_class_predictions_are_ignored() {
        let single = Prediction {
            ranked: vec![ScoredClass { class: "A".into(), prob: 1.0 }],
        };
        let report = count_close_calls(&[single], 1.0);
        assert_eq!(report.close_calls, 0);
        assert!(report.class_counts.is_empty());
    }

    #[test]
    fn test_validation() {
        let ok = AmbiguityConfig { infer: InferConfig::default(), margin: DEFAULT_MARGIN };
        assert!(ok.validate().is_ok());

        let top1 = AmbiguityConfig { infer: InferConfig { top_k: 1, ..InferConfig::default() }, ..ok.clone() };
        assert!(top1.validate().is_err());

        let negative = AmbiguityConfig { margin: -0.1, ..ok };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_full_margin_counts_every_record() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(&dir.path().join("model"), &["A", "B", "C"], true, true);
        let test_fn = dir.path().join("test.tsv");
        write_test_file(&test_fn);

        let cfg = AmbiguityConfig {
            infer: InferConfig {
                model_fn: dir.path().join("model").display().to_string(),
                test_fn:  test_fn.display().to_string(),
                ..InferConfig::default()
            },
            margin: 1.0,
        };
        let report = AmbiguityUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.close_calls, 4);
        assert_eq!(report.class_counts.iter().map(|(_, n)| n).sum::<usize>(), 8);
    }
}
