// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Accuracy of the ensemble's top-1 class against the gold label.
//
// Pair disambiguation (optional):
//   Two classes A and B are often confused. When a record's top
//   two classes are exactly {A, B}, in either order, a secondary
//   two-class checkpoint re-judges it:
//
//     main ensemble    → top-2 = {A, B}  → ambiguous
//     pair ensemble    → top-1 on the same sentence replaces
//                        the main prediction for that record
//
//   The pair ensemble runs once over the whole file, with the
//   same batch partition as the main pass, so every record is
//   padded exactly as it was there. Only the ambiguous rows are
//   kept. Both pair classes must exist in the main checkpoint,
//   and the pair checkpoint's classes must be exactly {A, B}.

use std::collections::HashMap;

use anyhow::{bail, Result};
use burn::prelude::*;

use crate::application::config::InferConfig;
use crate::domain::prediction::Prediction;
use crate::domain::record::InputRecord;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EvaluationMetrics, MetricsLogger};
use crate::ml::backend::{run_on_device, BackendTask};
use crate::ml::inferencer::Inferencer;

/// Secondary checkpoint and the class pair it separates.
#[derive(Debug, Clone)]
pub struct PairConfig {
    pub model_fn: String,
    pub first:    String,
    pub second:   String,
}

#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub infer:       InferConfig,
    pub pair:        Option<PairConfig>,
    pub metrics_csv: Option<String>,
}

impl EvaluateConfig {
    pub fn validate(&self) -> Result<()> {
        self.infer.validate()?;
        if let Some(pair) = &self.pair {
            if self.infer.top_k < 2 {
                bail!("--pair needs --top-k of at least 2");
            }
            if pair.first == pair.second {
                bail!("--pair needs two different classes, got '{}' twice", pair.first);
            }
        }
        Ok(())
    }
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EvaluationMetrics> {
        self.config.validate()?;
        let metrics = run_on_device(self.config.infer.gpu_id, self)?;

        tracing::info!(
            "{}/{} correct ({} disambiguated)",
            metrics.correct,
            metrics.total,
            metrics.disambiguated
        );

        if let Some(csv) = &self.config.metrics_csv {
            MetricsLogger::new(csv)?.log(&metrics)?;
        }
        Ok(metrics)
    }
}

impl BackendTask for &EvaluateUseCase {
    type Output = EvaluationMetrics;

    fn run<B: Backend>(self, device: B::Device) -> Result<EvaluationMetrics> {
        let infer = &self.config.infer;
        let records = infer.load_records()?;
        if records.is_empty() {
            bail!("No records to evaluate in '{}'", infer.test_fn);
        }

        let ckpt = CheckpointManager::new(&infer.model_fn);
        let inferencer = Inferencer::<B>::from_checkpoint(&ckpt, &infer.ensemble_options(), &device)?;
        let predictions = inferencer.predict(&records, infer.top_k)?;

        let overrides = match &self.config.pair {
            Some(pair) => {
                for name in [&pair.first, &pair.second] {
                    if !inferencer.classes().contains(name) {
                        bail!(
                            "--pair class '{}' is not a class of '{}' (classes: {})",
                            name,
                            infer.model_fn,
                            inferencer.classes().names().join(", ")
                        );
                    }
                }
                disambiguate::<B>(pair, infer, &records, &predictions, &device)?
            }
            None => HashMap::new(),
        };

        Ok(EvaluationMetrics {
            model:         infer.model_fn.clone(),
            members:       inferencer.member_names().join("+"),
            total:         records.len(),
            correct:       count_correct(&records, &predictions, &overrides),
            disambiguated: overrides.len(),
        })
    }
}

/// Re-judge every record whose top two classes are the configured pair.
/// Returns the pair model's top-1 class keyed by record index.
fn disambiguate<B: Backend>(
    pair:        &PairConfig,
    infer:       &InferConfig,
    records:     &[InputRecord],
    predictions: &[Prediction],
    device:      &B::Device,
) -> Result<HashMap<usize, String>> {
    let ambiguous = ambiguous_indices(predictions, &pair.first, &pair.second);
    tracing::info!(
        "{} records have top-2 {{{}, {}}}",
        ambiguous.len(),
        pair.first,
        pair.second
    );

    let ckpt = CheckpointManager::new(&pair.model_fn);
    let secondary = Inferencer::<B>::from_checkpoint(&ckpt, &infer.ensemble_options(), device)?;
    let classes = secondary.classes();
    if classes.len() != 2 {
        bail!(
            "Pair model '{}' must have exactly 2 classes, found {}",
            pair.model_fn,
            classes.len()
        );
    }
    if !(classes.contains(&pair.first) && classes.contains(&pair.second)) {
        bail!(
            "Pair model '{}' separates {{{}}}, not {{{}, {}}}",
            pair.model_fn,
            classes.names().join(", "),
            pair.first,
            pair.second
        );
    }

    if ambiguous.is_empty() {
        return Ok(HashMap::new());
    }

    let resolved = secondary.predict(records, 1)?;
    Ok(pair_overrides(&ambiguous, &resolved))
}

/// The pair model's top-1 class for each ambiguous record index.
pub fn pair_overrides(ambiguous: &[usize], resolved: &[Prediction]) -> HashMap<usize, String> {
    ambiguous
        .iter()
        .filter_map(|&i| resolved.get(i).map(|p| (i, p.top1().class.clone())))
        .collect()
}

/// Indices of predictions whose top two classes are `{a, b}`.
pub fn ambiguous_indices(predictions: &[Prediction], a: &str, b: &str) -> Vec<usize> {
    predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.top2_is_pair(a, b))
        .map(|(i, _)| i)
        .collect()
}

/// Records whose final class matches the label. `overrides` replaces
/// the top-1 class of the records it names.
pub fn count_correct(
    records:     &[InputRecord],
    predictions: &[Prediction],
    overrides:   &HashMap<usize, String>,
) -> usize {
    records
        .iter()
        .zip(predictions)
        .enumerate()
        .filter(|(i, (record, prediction))| {
            let guess = overrides
                .get(i)
                .map(String::as_str)
                .unwrap_or(prediction.top1().class.as_str());
            guess == record.label
        })
        .count()
}
