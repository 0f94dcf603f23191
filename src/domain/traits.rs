// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer asks for records through RecordSource
// and never sees the file format behind it.
//
// Implementations:
//   - TsvLoader  → tag<TAB>sentence files

use anyhow::Result;
use crate::domain::record::InputRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled test records.
pub trait RecordSource {
    /// Load every record, in source order.
    fn load_all(&self) -> Result<Vec<InputRecord>>;
}
