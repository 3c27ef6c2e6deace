//! Utility modules.

/// Timestamp parsing shared by providers.
pub mod datetime;

/// Body truncation and secret masking for log lines.
pub mod log_sanitizer;
