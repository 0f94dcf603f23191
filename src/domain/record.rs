// ============================================================
// Layer 3 — InputRecord Domain Type
// ============================================================
// One row of the test file after tokenisation:
//   tag<TAB>w1 w2 w3 ...  →  InputRecord { label: tag, tokens: [w1, w2, w3] }
//
// The label is kept as the raw class string so it can be
// compared directly against the class names restored from a
// checkpoint.

/// A labelled, whitespace-tokenised sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Gold class name from the first TSV column
    pub label: String,

    /// Tokens of the sentence, already capped to `max_length`
    pub tokens: Vec<String>,
}

impl InputRecord {
    pub fn new(label: impl Into<String>, tokens: Vec<String>) -> Self {
        Self { label: label.into(), tokens }
    }

    /// The sentence re-joined with single spaces (used for reporting).
    pub fn sentence(&self) -> String {
        self.tokens.join(" ")
    }
}
