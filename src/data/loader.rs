// ============================================================
// Layer 4 — Test File Loader
// ============================================================
// Loads labelled sentences from a tab-separated file:
//
//   <tag>\t<token> <token> <token> ...
//
// There is no header row. Blank lines are ignored. A row whose
// sentence is empty after cleaning (including rows with no tab
// at all) is skipped together with its tag, so labels and
// sentences never drift out of alignment.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (Reading a File)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::preprocessor::Preprocessor;
use crate::domain::record::InputRecord;
use crate::domain::traits::RecordSource;

/// Loads a `tag<TAB>sentence` file.
/// Implements the RecordSource trait from Layer 3.
pub struct TsvLoader {
    path:         PathBuf,
    preprocessor: Preprocessor,
}

impl TsvLoader {
    pub fn new(path: impl Into<PathBuf>, max_length: usize) -> Self {
        Self {
            path:         path.into(),
            preprocessor: Preprocessor::new(max_length),
        }
    }

    /// Parse file contents that are already in memory.
    pub fn parse(&self, contents: &str) -> Vec<InputRecord> {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let (tag, sentence) = line.split_once('\t').unwrap_or((line, ""));
            let tokens = self.preprocessor.tokenize(sentence);

            if tokens.is_empty() {
                tracing::debug!("Skipping line {}: empty sentence", line_no + 1);
                skipped += 1;
                continue;
            }

            records.push(InputRecord::new(self.preprocessor.clean(tag), tokens));
        }

        if skipped > 0 {
            tracing::warn!(
                "Skipped {} rows without a sentence in '{}'",
                skipped,
                self.path.display()
            );
        }
        records
    }
}

impl RecordSource for TsvLoader {
    fn load_all(&self) -> Result<Vec<InputRecord>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read test file '{}'", self.path.display()))?;

        let records = self.parse(&contents);
        tracing::info!("Loaded {} records from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_tag_and_tokens() {
        let loader = TsvLoader::new("unused.tsv", 256);
        let records = loader.parse("A\thello world\nB\tgood bye\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "A");
        assert_eq!(records[0].tokens, vec!["hello", "world"]);
        assert_eq!(records[1].label, "B");
    }

    #[test]
    fn test_skips_blank_and_empty_sentence_rows() {
        let loader = TsvLoader::new("unused.tsv", 256);
        let records = loader.parse("\nA\t   \nB\nC\tkept here\n\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "C");
    }

    #[test]
    fn test_bom_and_crlf_are_stripped() {
        let loader = TsvLoader::new("unused.tsv", 256);
        let records = loader.parse("\u{FEFF}A\tx y\r\nB\tz\r\n");
        assert_eq!(records[0].label, "A");
        assert_eq!(records[0].tokens, vec!["x", "y"]);
        assert_eq!(records[1].tokens, vec!["z"]);
    }

    #[test]
    fn test_load_all_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "label\tone two three").unwrap();
        let loader = TsvLoader::new(f.path(), 2);
        let records = loader.load_all().unwrap();
        assert_eq!(records, vec![InputRecord::new("label", vec!["one".into(), "two".into()])]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = TsvLoader::new("/definitely/not/here.tsv", 8);
        assert!(loader.load_all().is_err());
    }
}
