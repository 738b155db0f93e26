//! Mediagrab - best-quality media downloader
//!
//! This library crate exposes the core functionality for integration testing.

pub mod extractor;
pub mod pipeline;
