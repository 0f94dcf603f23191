// ============================================================
// Layer 5 — Training Configuration
// ============================================================
// The hyperparameters a checkpoint was trained with. They are
// stored next to the weights as train_config.json and are the
// only way to rebuild model shapes before loading a record:
//
//   {
//     "word_vec_size": 256,
//     "hidden_size": 512,
//     "n_layers": 4,
//     "dropout": 0.3,
//     "use_batch_norm": false,
//     "window_sizes": [3, 4, 5],
//     "n_filters": [100, 100, 100]
//   }
//
// Fields missing from the file take the defaults below.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::ml::cnn::CnnClassifierConfig;
use crate::ml::rnn::RnnClassifierConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub word_vec_size:  usize,
    pub hidden_size:    usize,
    pub n_layers:       usize,
    pub dropout:        f64,
    pub use_batch_norm: bool,
    pub window_sizes:   Vec<usize>,
    pub n_filters:      Vec<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            word_vec_size:  256,
            hidden_size:    512,
            n_layers:       4,
            dropout:        0.3,
            use_batch_norm: false,
            window_sizes:   vec![3, 4, 5],
            n_filters:      vec![100, 100, 100],
        }
    }
}

impl TrainConfig {
    /// Shape of the RNN member for a given vocabulary and label set.
    pub fn rnn_config(&self, vocab_size: usize, n_classes: usize) -> Result<RnnClassifierConfig> {
        if self.n_layers == 0 {
            bail!("n_layers must be at least 1");
        }

        Ok(RnnClassifierConfig::new(vocab_size, self.word_vec_size, self.hidden_size, n_classes)
            .with_n_layers(self.n_layers)
            .with_dropout_p(self.dropout))
    }

    /// Shape of the CNN member. Fails when the window and filter lists disagree.
    pub fn cnn_config(&self, vocab_size: usize, n_classes: usize) -> Result<CnnClassifierConfig> {
        if self.window_sizes.is_empty() {
            bail!("window_sizes must not be empty");
        }
        if self.window_sizes.len() != self.n_filters.len() {
            bail!(
                "window_sizes ({}) and n_filters ({}) must have the same length",
                self.window_sizes.len(),
                self.n_filters.len()
            );
        }
        if self.window_sizes.contains(&0) {
            bail!("window sizes must be positive");
        }

        Ok(CnnClassifierConfig::new(
            vocab_size,
            self.word_vec_size,
            n_classes,
            self.window_sizes.clone(),
            self.n_filters.clone(),
        )
        .with_use_batch_norm(self.use_batch_norm)
        .with_dropout_p(self.dropout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg: TrainConfig = serde_json::from_str(r#"{ "hidden_size": 64 }"#).unwrap();
        assert_eq!(cfg.hidden_size, 64);
        assert_eq!(cfg.window_sizes, vec![3, 4, 5]);
    }

    #[test]
    fn test_cnn_config_rejects_mismatched_lists() {
        let cfg = TrainConfig { n_filters: vec![10], ..TrainConfig::default() };
        assert!(cfg.cnn_config(10, 2).is_err());

        let cfg = TrainConfig { window_sizes: vec![], n_filters: vec![], ..TrainConfig::default() };
        assert!(cfg.cnn_config(10, 2).is_err());
    }

    #[test]
    fn test_rnn_config_carries_hyperparameters() {
        let cfg = TrainConfig { n_layers: 2, dropout: 0.1, ..TrainConfig::default() };
        let rnn = cfg.rnn_config(100, 5).unwrap();
        assert_eq!(rnn.input_size, 100);
        assert_eq!(rnn.n_classes, 5);
        assert_eq!(rnn.n_layers, 2);
    }

    #[test]
    fn test_rnn_config_rejects_zero_layers() {
        let cfg = TrainConfig { n_layers: 0, ..TrainConfig::default() };
        assert!(cfg.rnn_config(100, 5).is_err());
    }
}
