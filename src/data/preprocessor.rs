// ============================================================
// Layer 4 — Sentence Preprocessor
// ============================================================
// Turns the raw sentence column of the test file into tokens.
//
// The test data is already tokenised upstream (morphemes
// separated by single spaces), so tokenisation here is only a
// split on spaces. Cleaning covers what tends to leak into
// exported TSV files:
//   - UTF-8 byte order mark (U+FEFF) at the start of the file
//   - Zero-width spaces (U+200B) from copy-pasting
//   - Non-breaking spaces (U+00A0)
//   - Carriage returns from Windows line endings
//   - Other control characters
//
// Steps (applied in order):
//   1. Map/remove the characters above
//   2. Trim the sentence
//   3. Split on spaces, dropping empty pieces from runs of spaces
//   4. Keep at most `max_length` tokens
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor {
    /// Maximum number of tokens kept per sentence
    max_length: usize,
}

impl Preprocessor {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Normalise a raw text field. Takes a &str and returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        text.chars()
            .filter_map(|c| match c {
                // Invisible characters are dropped entirely
                '\u{FEFF}' | '\u{200B}' | '\r' => None,
                '\t' | '\u{00A0}' => Some(' '),
                c if c.is_control() => Some(' '),
                c => Some(c),
            })
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Clean and split a sentence into at most `max_length` tokens.
    pub fn tokenize(&self, sentence: &str) -> Vec<String> {
        self.clean(sentence)
            .split(' ')
            .filter(|t| !t.is_empty())
            .take(self.max_length)
            .map(str::to_string)
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(256)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::default();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_strips_bom_and_carriage_return() {
        let p = Preprocessor::default();
        assert_eq!(p.clean("\u{FEFF}hello world\r"), "hello world");
    }

    #[test]
    fn test_splits_on_spaces_and_drops_empty_tokens() {
        let p = Preprocessor::default();
        assert_eq!(p.tokenize("a  b   c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_caps_token_count() {
        let p = Preprocessor::new(3);
        assert_eq!(p.tokenize("a b c d e"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::default();
        assert!(p.tokenize("").is_empty());
        assert!(p.tokenize("   ").is_empty());
    }
}
