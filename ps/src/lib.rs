//! PlanStore - JSON document store for plangen records
//!
//! One file per record, one directory per collection. Writes go through a
//! temp-file + rename so a crash mid-write never leaves a torn record.
//! Collections are declared by the [`Record`] trait on the stored type.

mod store;

pub use store::{PlanStore, Record, StoreError};

/// Get current Unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
