//! Character n-gram predictability scoring library.
//!
//! This crate provides:
//! - Character-level n-gram models of every order up to a maximum
//! - Longest-suffix backoff log-probability estimation
//! - Per-line scoring of text (e.g. password predictability)
//! - Text and binary persistence of trained models
//!
//! A run is described by an immutable `Config` and executed by `runner::run`.

/// Run configuration (mode, order, streams, model format).
pub mod config;

/// Error type and `Result` alias.
pub mod error;

/// Opening of files or standard streams.
pub mod io;

/// N-gram models, training, scoring and persistence.
pub mod model;

/// Train and predict drivers.
pub mod runner;

pub use config::{Config, Mode, ModelFormat};
pub use error::{NGramError, Result};
pub use model::model_set::{LogProb, ModelSet};
pub use model::scorer::{LineScore, Scorer};
