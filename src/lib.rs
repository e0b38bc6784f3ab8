//! Library exports for the `hashaudit` binary, benchmarks and tests.
/// Supported digest algorithms and digest values.
pub mod algorithm;
/// Application directory helpers.
pub mod app_dirs;
/// Command line parsing and the top-level run loop.
pub mod cli;
/// Persisted settings.
pub mod config;
/// Streaming multi-algorithm file hashing.
pub mod digesting;
/// Match classification and audit accounting.
pub mod engine;
/// Known file sets: store, digest index, loader and writer.
pub mod known;
/// Logging setup.
pub mod logging;
/// Fixed status lines for matching and audit output.
pub mod report;
/// Input traversal and per-file classification.
pub mod scan;
