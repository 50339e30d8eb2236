//! Shared tracing/logging setup for depot binaries and test harnesses.

pub mod tracing;

/// Initialize process-wide observability with the default (JSON) output.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
