use std::path::{Path, PathBuf};

use crate::error::{NGramError, Result};

/// Default maximum n-gram order.
pub const DEFAULT_ORDER: usize = 3;

/// What a run does with its streams.
///
/// # Variants
/// - `Train`: read a corpus, write the trained model.
/// - `Predict`: read a model, score input lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	Train,
	Predict,
}

impl Mode {
	/// Picks the mode from two on/off switches.
	///
	/// # Errors
	/// Returns `NGramError::Mode` unless exactly one switch is set.
	pub fn from_flags(train: bool, predict: bool) -> Result<Self> {
		match (train, predict) {
			(true, false) => Ok(Mode::Train),
			(false, true) => Ok(Mode::Predict),
			_ => Err(NGramError::Mode),
		}
	}
}

/// Encoding of a persisted model.
///
/// - `Text`: one `<size>\t<ngram>\t<count>` line per record
/// - `Binary`: a `postcard` snapshot of the same records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelFormat {
	#[default]
	Text,
	Binary,
}

/// Settings of one run, built once at startup and never mutated.
///
/// Paths left to `None` map to the standard streams:
/// - `input`: standard input
/// - `output`: standard output
/// - `model`: standard output when training, standard input when predicting
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	mode: Mode,
	order: usize,
	input: Option<PathBuf>,
	output: Option<PathBuf>,
	model: Option<PathBuf>,
	format: ModelFormat,
}

impl Config {
	/// Creates a configuration reading and writing the standard streams.
	///
	/// # Errors
	/// Returns `NGramError::InvalidOrder` if `order` is 0.
	pub fn new(mode: Mode, order: usize) -> Result<Self> {
		if order == 0 {
			return Err(NGramError::InvalidOrder(order));
		}
		Ok(Self { mode, order, input: None, output: None, model: None, format: ModelFormat::default() })
	}

	pub fn with_input(mut self, input: Option<PathBuf>) -> Self {
		self.input = input;
		self
	}

	pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
		self.output = output;
		self
	}

	pub fn with_model(mut self, model: Option<PathBuf>) -> Self {
		self.model = model;
		self
	}

	pub fn with_format(mut self, format: ModelFormat) -> Self {
		self.format = format;
		self
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Maximum n-gram order; models of sizes `1..=order` are built.
	pub fn order(&self) -> usize {
		self.order
	}

	pub fn input(&self) -> Option<&Path> {
		self.input.as_deref()
	}

	pub fn output(&self) -> Option<&Path> {
		self.output.as_deref()
	}

	pub fn model(&self) -> Option<&Path> {
		self.model.as_deref()
	}

	pub fn format(&self) -> ModelFormat {
		self.format
	}
}
