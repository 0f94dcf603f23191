// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   record.rs     — one labelled, tokenised test sentence
//   prediction.rs — ranked (class, probability) output and the
//                   top-k ranking rule
//   traits.rs     — the RecordSource abstraction
//
// No Burn types and no file I/O live here, so everything in
// this layer is testable without a backend.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled test sentence
pub mod record;

// Ranked predictions and top-k selection
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;
