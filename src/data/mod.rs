// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw test file and an integer tensor:
//
//   test_token.tsv
//       │
//       ▼
//   TsvLoader      → reads tag<TAB>sentence rows
//       │
//       ▼
//   Preprocessor   → cleans and splits sentences, caps length
//       │
//       ▼
//   Vocab          → token ↔ index table from the checkpoint
//       │
//       ▼
//   TextBatcher    → pads and numericalises a batch of records
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the tab-separated test file
pub mod loader;

/// Cleans and tokenises sentences
pub mod preprocessor;

/// Vocabulary and class lookup tables
pub mod vocab;

/// Implements Burn's Batcher trait to create token tensors
pub mod batcher;
