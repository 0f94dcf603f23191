// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case turns a validated config into a result the CLI
// prints. Steps are always the same:
//
//   1. validate the config (before any file is touched)
//   2. pick a backend from --gpu-id
//   3. load records and the checkpoint ensemble
//   4. run inference and aggregate
//
// No printing happens here. That is Layer 1's job.

// Shared inference settings
pub mod config;

// Top-k rankings per sentence
pub mod predict_use_case;

// Accuracy, with optional pair disambiguation
pub mod evaluate_use_case;

// Close-call counter over the top-2 predictions
pub mod ambiguity_use_case;
