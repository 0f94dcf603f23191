// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here. Layers 2-4 only see the
// Inferencer and plain Rust types.
//
//   config.rs     — TrainConfig stored in a checkpoint
//   rnn.rs        — bidirectional LSTM classifier
//   cnn.rs        — multi-window CNN classifier
//   ensemble.rs   — probability averaging over members
//   inferencer.rs — checkpoint → ensemble → predictions
//   backend.rs    — CPU / GPU backend dispatch
//
// Reference: Burn Book §3 (Building Blocks)

/// Hyperparameters saved with a checkpoint
pub mod config;

/// BiLSTM text classifier
pub mod rnn;

/// CNN text classifier
pub mod cnn;

/// Ensemble of classifiers
pub mod ensemble;

/// Inference engine: loads a checkpoint and predicts classes
pub mod inferencer;

/// Runtime backend selection
pub mod backend;
