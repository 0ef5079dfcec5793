//! Character n-gram language model.
//!
//! This module provides:
//! - Fixed-order frequency tables (`NGramModel`)
//! - Multi-order sets with backoff estimation (`ModelSet`)
//! - Line scoring (`Scorer`)
//! - Persistence of model sets (`serializer`)

/// Fixed-order n-gram frequency table.
///
/// Counts windows of one length and keeps their running total.
pub mod ngram_model;

/// Family of n-gram models of sizes `1..=N`.
///
/// Handles training over corpus lines and longest-suffix backoff
/// log-probability estimation.
pub mod model_set;

/// Per-line scoring of text against a `ModelSet`.
pub mod scorer;

/// Text and binary persistence of model sets.
pub mod serializer;

/// Whitespace normalization and sliding windows.
pub mod text;
