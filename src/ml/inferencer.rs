// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Restores an ensemble from a checkpoint directory and turns
// records into averaged class probabilities or ranked
// predictions.
use std::sync::Arc;

use anyhow::{Context, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{batcher::TextBatcher, vocab::Classes};
use crate::domain::prediction::{rank_top_k, Prediction};
use crate::domain::record::InputRecord;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::ensemble::{Ensemble, EnsembleMember};

/// Which members to load and how many records per forward pass.
#[derive(Debug, Clone, Copy)]
pub struct EnsembleOptions {
    pub batch_size: usize,
    pub drop_rnn:   bool,
    pub drop_cnn:   bool,
}

pub struct Inferencer<B: Backend> {
    ensemble:   Ensemble<B>,
    batcher:    TextBatcher<B>,
    classes:    Classes,
    batch_size: usize,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        opts:         &EnsembleOptions,
        device:       &B::Device,
    ) -> Result<Self> {
        let cfg     = ckpt_manager.load_config()?;
        let vocab   = ckpt_manager.load_vocab()?;
        let classes = ckpt_manager.load_classes()?;
        tracing::info!(
            "Checkpoint '{}': {} tokens, {} classes",
            ckpt_manager.dir().display(),
            vocab.len(),
            classes.len()
        );

        let mut members = Vec::new();

        if opts.drop_rnn {
            tracing::info!("RNN dropped from the ensemble");
        } else if ckpt_manager.has_rnn() {
            let model = cfg.rnn_config(vocab.len(), classes.len())?.init::<B>(device);
            if let Some(model) = ckpt_manager.load_rnn(model, device)? {
                members.push(EnsembleMember::Rnn(model));
            }
        }

        if opts.drop_cnn {
            tracing::info!("CNN dropped from the ensemble");
        } else if ckpt_manager.has_cnn() {
            let model = cfg.cnn_config(vocab.len(), classes.len())?.init::<B>(device);
            if let Some(model) = ckpt_manager.load_cnn(model, device)? {
                members.push(EnsembleMember::Cnn(model));
            }
        }

        let ensemble = Ensemble::new(members).with_context(|| {
            format!("Cannot build an ensemble from '{}'", ckpt_manager.dir().display())
        })?;
        tracing::info!("Ensemble ready: {:?}", ensemble.member_names());

        Ok(Self {
            ensemble,
            batcher: TextBatcher::new(Arc::new(vocab), device.clone()),
            classes,
            batch_size: opts.batch_size.max(1),
        })
    }

    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    pub fn member_names(&self) -> Vec<&'static str> {
        self.ensemble.member_names()
    }

    /// One averaged probability row per record, in record order.
    pub fn probabilities(&self, records: &[InputRecord]) -> Result<Vec<Vec<f32>>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<_> = records
            .chunks(self.batch_size)
            .map(|chunk| self.batcher.batch(chunk.to_vec()))
            .collect();
        tracing::debug!("{} records in {} batches", records.len(), batches.len());

        let probs = self.ensemble.average_probs(&batches)?;
        let [_, n_classes] = probs.dims();

        let flat = probs
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read ensemble output: {e:?}"))?;

        Ok(flat.chunks(n_classes).map(<[f32]>::to_vec).collect())
    }

    /// Ranked top-k classes for each record.
    pub fn predict(&self, records: &[InputRecord], top_k: usize) -> Result<Vec<Prediction>> {
        self.probabilities(records)?
            .iter()
            .map(|row| rank_top_k(row, self.classes.names(), top_k))
            .collect()
    }
}
