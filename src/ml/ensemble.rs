// ============================================================
// Layer 5 — Ensemble
// ============================================================
// Every member emits log-probabilities. The ensemble turns them
// back into probabilities and takes the mean:
//
//   P(c | x) = (1 / M) · Σ_m exp(log p_m(c | x))
//
// Each member runs over every batch in order, and the per-batch
// outputs are concatenated before averaging. Rows therefore
// line up with the input records.

use anyhow::{bail, Result};
use burn::prelude::*;

use crate::data::batcher::TextBatch;
use crate::ml::cnn::CnnClassifier;
use crate::ml::rnn::RnnClassifier;

#[derive(Debug)]
pub enum EnsembleMember<B: Backend> {
    Rnn(RnnClassifier<B>),
    Cnn(CnnClassifier<B>),
}

impl<B: Backend> EnsembleMember<B> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rnn(_) => "rnn",
            Self::Cnn(_) => "cnn",
        }
    }

    /// tokens: [batch, seq_len] → log-probabilities: [batch, n_classes]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        match self {
            Self::Rnn(model) => model.forward(tokens),
            Self::Cnn(model) => model.forward(tokens),
        }
    }
}

#[derive(Debug)]
pub struct Ensemble<B: Backend> {
    members: Vec<EnsembleMember<B>>,
}

impl<B: Backend> Ensemble<B> {
    pub fn new(members: Vec<EnsembleMember<B>>) -> Result<Self> {
        if members.is_empty() {
            bail!("ensemble is empty: no model is available or all were dropped");
        }
        Ok(Self { members })
    }

    pub fn member_names(&self) -> Vec<&'static str> {
        self.members.iter().map(EnsembleMember::name).collect()
    }

    /// Averaged class probabilities — shape: [Σ batch sizes, n_classes]
    pub fn average_probs(&self, batches: &[TextBatch<B>]) -> Result<Tensor<B, 2>> {
        if batches.is_empty() {
            bail!("no batches to run");
        }

        let mut sum: Option<Tensor<B, 2>> = None;
        for member in &self.members {
            let outputs: Vec<Tensor<B, 2>> = batches
                .iter()
                .map(|batch| member.forward(batch.tokens.clone()))
                .collect();
            let probs = Tensor::cat(outputs, 0).exp();
            tracing::debug!("{} produced {:?}", member.name(), probs.dims());

            sum = Some(match sum {
                Some(acc) => acc + probs,
                None => probs,
            });
        }

        match sum {
            Some(total) => Ok(total.div_scalar(self.members.len() as f32)),
            None => bail!("ensemble is empty"),
        }
    }
}
