//! Persistence: an append-only log of tagged elements on disk.
//!
//! # Invariants
//! - The element log is append-only.
//! - The recorded digest covers every byte of the log; appends refuse to
//!   extend a log that no longer matches it.
//! - A malformed element is reported and skipped on load; it does not hide
//!   the elements after it.

pub mod store;

pub use store::{ElementStore, LoadReport, StoreError, StoreMeta};

pub fn crate_info() -> &'static str {
    "voxelesque-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
