// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the checkpoint ensemble, reads the test file and ranks
// the top-k classes of every sentence.
//
// Padding depends on which records share a batch, so the whole
// file is always classified. --limit N only trims the output.

use anyhow::Result;
use burn::prelude::*;

use crate::application::config::InferConfig;
use crate::domain::prediction::Prediction;
use crate::domain::record::InputRecord;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::backend::{run_on_device, BackendTask};
use crate::ml::inferencer::Inferencer;

/// A record paired with its ranked prediction.
#[derive(Debug, Clone)]
pub struct RankedRecord {
    pub record:     InputRecord,
    pub prediction: Prediction,
}

pub struct PredictUseCase {
    config: InferConfig,
    limit:  Option<usize>,
}

impl PredictUseCase {
    pub fn new(config: InferConfig, limit: Option<usize>) -> Self {
        Self { config, limit }
    }

    pub fn execute(&self) -> Result<Vec<RankedRecord>> {
        self.config.validate()?;
        run_on_device(self.config.gpu_id, self)
    }
}

impl BackendTask for &PredictUseCase {
    type Output = Vec<RankedRecord>;

    fn run<B: Backend>(self, device: B::Device) -> Result<Vec<RankedRecord>> {
        let records = self.config.load_records()?;
        tracing::info!("Ranking {} records", records.len());

        let ckpt = CheckpointManager::new(&self.config.model_fn);
        let inferencer =
            Inferencer::<B>::from_checkpoint(&ckpt, &self.config.ensemble_options(), &device)?;
        let predictions = inferencer.predict(&records, self.config.top_k)?;

        Ok(records
            .into_iter()
            .zip(predictions)
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|(record, prediction)| RankedRecord { record, prediction })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_checkpoint, write_test_file};

    fn config(dir: &std::path::Path) -> InferConfig {
        let test_fn = dir.join("test.tsv");
        write_test_file(&test_fn);
        InferConfig {
            model_fn:   dir.join("model").display().to_string(),
            test_fn:    test_fn.display().to_string(),
            batch_size: 2,
            ..InferConfig::default()
        }
    }

    #[test]
    fn test_ranks_every_record_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(&dir.path().join("model"), &["A", "B", "C"], true, true);

        let ranked = PredictUseCase::new(config(dir.path()), None).execute().unwrap();
        let labels: Vec<_> = ranked.iter().map(|r| r.record.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "A"]);
        assert!(ranked.iter().all(|r| r.prediction.ranked.len() == 2));
    }

    #[test]
    fn test_limit_truncates() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(&dir.path().join("model"), &["A", "B"], false, true);

        let ranked = PredictUseCase::new(config(dir.path()), Some(1)).execute().unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].record.sentence(), "the model");
    }

    #[test]
    fn test_limit_does_not_change_the_rows_it_keeps() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(&dir.path().join("model"), &["A", "B", "C"], true, true);

        // "the model" shares a batch with longer rows only in the full run
        let cfg = InferConfig { batch_size: 256, top_k: 3, ..config(dir.path()) };
        let all = PredictUseCase::new(cfg.clone(), None).execute().unwrap();
        let first = PredictUseCase::new(cfg, Some(1)).execute().unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].prediction, all[0].prediction);
    }

    #[test]
    fn test_invalid_config_fails_before_io() {
        let cfg = InferConfig { model_fn: "/nonexistent".into(), top_k: 0, ..InferConfig::default() };
        let err = PredictUseCase::new(cfg, None).execute().unwrap_err();
        assert!(err.to_string().contains("--top-k"));
    }
}
