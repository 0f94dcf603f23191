// ============================================================
// Layer 4 — Vocabulary and Class Tables
// ============================================================
// Both tables are restored from a checkpoint and only translate
// between strings and integer indices.
//
//   Vocab   — token ↔ index, with <unk> fallback and a <pad> index
//   Classes — class index → class name (no unk, no pad)
//
// On disk each table is a JSON array in index order, e.g.
//   ["<unk>", "<pad>", "the", "model", ...]

use anyhow::{bail, Result};
use std::collections::HashMap;

pub const UNK_TOKEN: &str = "<unk>";
pub const PAD_TOKEN: &str = "<pad>";

#[derive(Debug, Clone)]
pub struct Vocab {
    itos: Vec<String>,
    stoi: HashMap<String, usize>,
    unk:  usize,
    pad:  usize,
}

impl Vocab {
    /// Build from an index-ordered token list.
    ///
    /// `<pad>` must be present. Tokens missing from the table map to
    /// `<unk>`, or to index 0 when the table has no `<unk>`.
    pub fn from_itos(itos: Vec<String>) -> Result<Self> {
        if itos.is_empty() {
            bail!("vocabulary is empty");
        }

        let mut stoi = HashMap::with_capacity(itos.len());
        for (i, tok) in itos.iter().enumerate() {
            // first occurrence wins
            stoi.entry(tok.clone()).or_insert(i);
        }

        let pad = match stoi.get(PAD_TOKEN) {
            Some(&i) => i,
            None => bail!("vocabulary has no '{PAD_TOKEN}' token"),
        };
        let unk = stoi.get(UNK_TOKEN).copied().unwrap_or(0);

        Ok(Self { itos, stoi, unk, pad })
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn pad_index(&self) -> usize {
        self.pad
    }

    pub fn index_of(&self, token: &str) -> usize {
        self.stoi.get(token).copied().unwrap_or(self.unk)
    }

    #[cfg(test)]
    pub fn itos(&self) -> &[String] {
        &self.itos
    }
}

/// Class names in model output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classes {
    itos: Vec<String>,
}

impl Classes {
    pub fn new(itos: Vec<String>) -> Result<Self> {
        if itos.is_empty() {
            bail!("class list is empty");
        }
        Ok(Self { itos })
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    /// True when `name` is one of the classes.
    pub fn contains(&self, name: &str) -> bool {
        self.itos.iter().any(|c| c == name)
    }

    pub fn names(&self) -> &[String] {
        &self.itos
    }
}
