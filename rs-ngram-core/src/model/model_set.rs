use std::collections::BTreeMap;
use std::io::BufRead;

use log::{debug, info};

use super::ngram_model::NGramModel;
use super::text::normalize_line;
use crate::error::{NGramError, Result};
use crate::io::read_line_bytes;

/// Outcome of a backoff lookup.
///
/// `value` is a base-2 log-probability. `found` tells whether some suffix
/// of the key was actually observed, as opposed to the pseudo-count fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogProb {
	pub value: f64,
	pub found: bool,
}

impl LogProb {
	fn not_found(value: f64) -> Self {
		Self { value, found: false }
	}
}

/// A family of `NGramModel`s of sizes `1..=max_order`, trained and queried together.
///
/// # Responsibilities
/// - Train every order from the same corpus lines
/// - Estimate log-probabilities with longest-suffix backoff
/// - Give the serializer access to each model by size
///
/// # Invariants
/// - Sizes are contiguous from 1 to `max_order` when built with `new`
/// - The set of sizes never changes after construction
#[derive(Clone, Debug)]
pub struct ModelSet {
	models: BTreeMap<usize, NGramModel>,
}

impl ModelSet {
	/// Creates empty models for every size in `1..=max_order`.
	///
	/// # Errors
	/// Returns `NGramError::InvalidOrder` if `max_order` is 0.
	pub fn new(max_order: usize) -> Result<Self> {
		if max_order == 0 {
			return Err(NGramError::InvalidOrder(max_order));
		}
		Ok(Self::with_sizes(1..=max_order))
	}

	/// Builds a set holding exactly the given sizes, gaps included.
	pub(crate) fn with_sizes<I: IntoIterator<Item = usize>>(sizes: I) -> Self {
		let models = sizes.into_iter().map(|n| (n, NGramModel::new(n))).collect();
		Self { models }
	}

	/// Largest n-gram size in the set, 0 when the set is empty.
	pub fn max_order(&self) -> usize {
		self.models.keys().next_back().copied().unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Model of the given size, if the set has one.
	pub fn get(&self, size: usize) -> Option<&NGramModel> {
		self.models.get(&size)
	}

	pub(crate) fn get_mut(&mut self, size: usize) -> Option<&mut NGramModel> {
		self.models.get_mut(&size)
	}

	/// Iterates over the models in increasing size.
	pub fn models(&self) -> impl Iterator<Item = &NGramModel> {
		self.models.values()
	}

	/// Adds one corpus line to every model.
	///
	/// The line is whitespace-normalized first; each model then counts all
	/// of its windows. Lines shorter than a model's size leave it untouched.
	pub fn add_line(&mut self, line: &str) {
		let text = normalize_line(line);
		let chars: Vec<char> = text.chars().collect();
		for model in self.models.values_mut() {
			model.update(&chars);
		}
	}

	/// Trains on every line of `lines` and returns how many were used.
	///
	/// Training is additive: calling it again keeps accumulating counts.
	pub fn train<I, S>(&mut self, lines: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut line_count = 0;
		for line in lines {
			self.add_line(line.as_ref());
			line_count += 1;
		}
		debug!("trained on {line_count} lines");
		line_count
	}

	/// Trains on every line of a buffered reader.
	///
	/// Bytes that are not valid UTF-8 are replaced with U+FFFD, so every
	/// line is used.
	///
	/// # Errors
	/// Returns `NGramError::Stream` if reading fails; counts gathered from
	/// earlier lines are kept.
	pub fn train_reader<R: BufRead>(&mut self, mut reader: R) -> Result<usize> {
		let mut line_count = 0;
		let mut buf = Vec::new();
		while read_line_bytes(&mut reader, &mut buf)? {
			self.add_line(&String::from_utf8_lossy(&buf));
			line_count += 1;
		}
		info!("trained {} models on {line_count} lines", self.models.len());
		Ok(line_count)
	}

	/// Estimates `log2 P(key)` with longest-suffix backoff.
	///
	/// Suffixes of `key` are tried from the full key down to its last char.
	/// The first one present in the model of matching size yields
	/// `log2(count) - log2(total)` for that model. When none is present, the
	/// result is `-log2(total)` of the unigram model, i.e. a count of one
	/// against the coarsest distribution.
	///
	/// An untrained unigram model (total 0) gives `-inf` rather than the
	/// `+inf` that `log2(1) - log2(0)` would produce: a key scored against
	/// no evidence is treated as impossible, never as certain.
	///
	/// # Notes
	/// - Empty key or empty set: `-inf`, not found.
	/// - Suffix sizes with no model are skipped.
	/// - No unigram model: `-inf`, not found.
	pub fn log_prob(&self, key: &str) -> LogProb {
		let chars: Vec<char> = key.chars().collect();
		if self.models.is_empty() || chars.is_empty() {
			return LogProb::not_found(f64::NEG_INFINITY);
		}

		let mut fallback_total = None;
		for i in 0..chars.len() {
			let size = chars.len() - i;
			let Some(model) = self.models.get(&size) else {
				continue;
			};
			let suffix: String = chars[i..].iter().collect();
			if let Some(count) = model.count(&suffix) {
				return LogProb { value: count.log2() - model.total().log2(), found: true };
			}
			if size == 1 {
				fallback_total = Some(model.total());
			}
		}

		match fallback_total {
			Some(total) if total > 0.0 => LogProb::not_found(1f64.log2() - total.log2()),
			_ => LogProb::not_found(f64::NEG_INFINITY),
		}
	}
}
