// ============================================================
// Layer 4 — Text Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<InputRecord>
// into one integer tensor the classifiers can consume.
//
// How batching works here:
//   Input:  N records with token sequences of varying length
//   Output: TextBatch with a token tensor of shape [N, L]
//           where L = length of the longest sequence in the batch
//
//   Shorter sequences are padded at the end with the <pad> index,
//   then every token is replaced by its vocabulary index:
//
//     ["a", "b", "c"]      →  [ 5, 9, 2 ]
//     ["d"]                →  [ 7, 1, 1 ]   (pad index = 1)
//
//   The rows are flattened into one Vec and reshaped:
//   [r1_t1, ..., r1_tL, r2_t1, ..., rN_tL] → [N, L]
//
// Reference: Burn Book §4 (Batcher)

use std::sync::Arc;

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::vocab::Vocab;
use crate::domain::record::InputRecord;

// ─── TextBatch ────────────────────────────────────────────────────────────────
/// A batch of numericalised sentences ready for the forward pass.
#[derive(Debug, Clone)]
pub struct TextBatch<B: Backend> {
    /// Token indices — shape: [batch_size, max_len]
    pub tokens: Tensor<B, 2, Int>,
}

// ─── TextBatcher ──────────────────────────────────────────────────────────────
/// Holds the vocabulary and the target device.
#[derive(Clone, Debug)]
pub struct TextBatcher<B: Backend> {
    vocab:  Arc<Vocab>,
    device: B::Device,
}

impl<B: Backend> TextBatcher<B> {
    pub fn new(vocab: Arc<Vocab>, device: B::Device) -> Self {
        Self { vocab, device }
    }

    /// Pad and numericalise token rows into a flat, row-major index list.
    /// Returns the flat data and the padded row length.
    pub fn numericalize(&self, rows: &[&[String]]) -> (Vec<i32>, usize) {
        // An all-empty batch still needs one column for the models
        let max_len = rows.iter().map(|r| r.len()).max().unwrap_or(0).max(1);
        let pad = self.vocab.pad_index() as i32;

        let mut flat = Vec::with_capacity(rows.len() * max_len);
        for row in rows {
            flat.extend(row.iter().map(|t| self.vocab.index_of(t) as i32));
            flat.extend(std::iter::repeat(pad).take(max_len - row.len()));
        }
        (flat, max_len)
    }
}

impl<B: Backend> Batcher<InputRecord, TextBatch<B>> for TextBatcher<B> {
    fn batch(&self, items: Vec<InputRecord>) -> TextBatch<B> {
        let rows: Vec<&[String]> = items.iter().map(|r| r.tokens.as_slice()).collect();
        let (flat, max_len) = self.numericalize(&rows);

        let tokens = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([items.len(), max_len]);

        TextBatch { tokens }
    }
}
