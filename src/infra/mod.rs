// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed concerns used by the application layer:
//
//   checkpoint.rs — reading/writing the ensemble checkpoint
//                   directory (config, vocab, classes and
//                   CompactRecorder weight files)
//
//   metrics.rs    — appending evaluation results to a CSV
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Checkpoint loading and saving
pub mod checkpoint;

/// Evaluation metrics CSV logger
pub mod metrics;
