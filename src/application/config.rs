// ============================================================
// Layer 2 — Inference Configuration
// ============================================================
// Settings shared by every subcommand. The CLI builds this from
// its flags, so nothing below Layer 1 depends on clap.

use anyhow::{bail, Result};

use crate::data::loader::TsvLoader;
use crate::domain::record::InputRecord;
use crate::domain::traits::RecordSource;
use crate::ml::inferencer::EnsembleOptions;

#[derive(Debug, Clone)]
pub struct InferConfig {
    pub model_fn:   String,
    pub test_fn:    String,
    pub gpu_id:     i32,
    pub batch_size: usize,
    pub top_k:      usize,
    pub max_length: usize,
    pub drop_rnn:   bool,
    pub drop_cnn:   bool,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            model_fn:   "models/ntc".to_string(),
            test_fn:    "data/test_token.tsv".to_string(),
            gpu_id:     -1,
            batch_size: 256,
            top_k:      2,
            max_length: 256,
            drop_rnn:   false,
            drop_cnn:   false,
        }
    }
}

impl InferConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("--batch-size must be at least 1");
        }
        if self.top_k == 0 {
            bail!("--top-k must be at least 1");
        }
        if self.max_length == 0 {
            bail!("--max-length must be at least 1");
        }
        if self.drop_rnn && self.drop_cnn {
            bail!("--drop-rnn and --drop-cnn together leave an empty ensemble");
        }
        Ok(())
    }

    pub fn ensemble_options(&self) -> EnsembleOptions {
        EnsembleOptions {
            batch_size: self.batch_size,
            drop_rnn:   self.drop_rnn,
            drop_cnn:   self.drop_cnn,
        }
    }

    pub fn load_records(&self) -> Result<Vec<InputRecord>> {
        TsvLoader::new(&self.test_fn, self.max_length).load_all()
    }
}
