// ============================================================
// Layer 3 — Prediction Domain Type
// ============================================================
// The ensemble produces one probability row per record:
//   [p(class_0), p(class_1), ..., p(class_{C-1})]
//
// rank_top_k turns such a row into a Prediction: the k most
// probable classes, highest first. Equal probabilities keep
// the lower class index first so output is deterministic.

use anyhow::{bail, Result};

/// One entry of a ranked prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredClass {
    /// Class name (`classes.itos[index]`)
    pub class: String,
    /// Averaged ensemble probability
    pub prob: f32,
}

/// The top-k classes for a single record, descending by probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub ranked: Vec<ScoredClass>,
}

impl Prediction {
    /// The most probable class.
    pub fn top1(&self) -> &ScoredClass {
        &self.ranked[0]
    }

    /// The runner-up, if k >= 2.
    pub fn top2(&self) -> Option<&ScoredClass> {
        self.ranked.get(1)
    }

    /// Difference between the two best probabilities, if k >= 2.
    pub fn margin(&self) -> Option<f32> {
        self.top2().map(|second| (self.top1().prob - second.prob).abs())
    }

    /// True when the two best classes are exactly `{a, b}`, in either order.
    pub fn top2_is_pair(&self, a: &str, b: &str) -> bool {
        match self.top2() {
            Some(second) => {
                let first = self.top1().class.as_str();
                let second = second.class.as_str();
                (first == a && second == b) || (first == b && second == a)
            }
            None => false,
        }
    }

    /// Class names joined by a single space, e.g. "A B".
    pub fn class_names(&self) -> String {
        self.ranked
            .iter()
            .map(|s| s.class.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Select the `k` most probable classes from one probability row.
pub fn rank_top_k(row: &[f32], classes: &[String], k: usize) -> Result<Prediction> {
    if row.len() != classes.len() {
        bail!(
            "probability row has {} entries but there are {} classes",
            row.len(),
            classes.len()
        );
    }
    if k == 0 {
        bail!("top_k must be at least 1");
    }
    if k > classes.len() {
        bail!("top_k ({k}) exceeds the number of classes ({})", classes.len());
    }

    let mut order: Vec<usize> = (0..row.len()).collect();
    // sort_by is stable, so ties keep ascending index order
    order.sort_by(|&a, &b| row[b].total_cmp(&row[a]));

    let ranked = order
        .into_iter()
        .take(k)
        .map(|i| ScoredClass { class: classes[i].clone(), prob: row[i] })
        .collect();

    Ok(Prediction { ranked })
}
