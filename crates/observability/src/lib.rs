//! Tracing/logging setup shared by the binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format, None);
}

/// Like [`init`], but with an explicit default filter (e.g. `debug` for
/// `--verbose`). `RUST_LOG` still wins when set.
pub fn init_with_level(format: LogFormat, default_filter: &str) {
    tracing::init(format, Some(default_filter));
}
