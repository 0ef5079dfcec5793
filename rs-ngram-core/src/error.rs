//! Error type shared by every fallible operation of the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, training, persisting or scoring models.
///
/// Malformed lines inside a text model are not errors: the reader skips
/// them and reports them through `ReadStats`.
#[derive(Error, Debug)]
pub enum NGramError {
	/// A configured file could not be opened or created
	#[error("I/O error for {path}: {source}")]
	Path {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Reading from or writing to an already opened stream failed
	#[error("stream error: {0}")]
	Stream(#[from] std::io::Error),

	/// The maximum n-gram order must be at least 1
	#[error("invalid n-gram order {0}, must be >= 1")]
	InvalidOrder(usize),

	/// Neither or both of train/predict were requested
	#[error("either train or predict must be specified (exactly one)")]
	Mode,

	/// A binary snapshot could not be encoded or decoded
	#[error("snapshot error: {0}")]
	Snapshot(#[from] postcard::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, NGramError>;
