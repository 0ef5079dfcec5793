use super::text::windows;
use std::collections::HashMap;

/// Frequency table for character n-grams of one fixed length.
///
/// # Responsibilities
/// - Count every window of length `size` seen in training lines
/// - Keep the running `total` used as the denominator of probabilities
/// - Accept counts restored from a persisted model (overwrite semantics)
///
/// # Invariants
/// - `size` is always >= 1
/// - Every key in `counts` is exactly `size` chars long
/// - After training, `total == counts.values().sum()`
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// Length of every n-gram in the table, in chars
	size: usize,

	/// Observed n-grams and their (possibly fractional) counts
	counts: HashMap<String, f64>,

	/// Sum of the counts added so far
	total: f64,
}

impl NGramModel {
	/// Creates an empty model for n-grams of `size` characters.
	pub(crate) fn new(size: usize) -> Self {
		Self { size, counts: HashMap::new(), total: 0.0 }
	}

	/// Order of this model (n-gram length).
	pub fn size(&self) -> usize {
		self.size
	}

	/// Sum of all counts added to the table.
	pub fn total(&self) -> f64 {
		self.total
	}

	/// Count recorded for `ngram`, if it was ever observed.
	pub fn count(&self, ngram: &str) -> Option<f64> {
		self.counts.get(ngram).copied()
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(ngram, count)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.counts.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Counts every `size`-char window of an already normalized line.
	///
	/// Lines shorter than `size` contribute nothing.
	pub(crate) fn update(&mut self, chars: &[char]) {
		for key in windows(chars, self.size) {
			*self.counts.entry(key).or_insert(0.0) += 1.0;
			self.total += 1.0;
		}
	}

	/// Stores a persisted count for `ngram`.
	///
	/// The count replaces any previous value while `total` is always
	/// increased, so reading the same key twice leaves `total` larger
	/// than the sum of the counts.
	pub(crate) fn restore(&mut self, ngram: String, count: f64) {
		self.total += count;
		self.counts.insert(ngram, count);
	}
}
