use std::fmt;
use std::io::{BufRead, Write};

use log::info;

use super::model_set::ModelSet;
use super::text::{normalize_line, windows};
use crate::error::Result;
use crate::io::read_line_bytes;

/// Score of one input line.
///
/// `Degenerate` is emitted for lines shorter than the scoring order: no
/// window can be drawn, so only the text is reported with a 0.0 score.
#[derive(Clone, Debug, PartialEq)]
pub enum LineScore {
	Degenerate {
		text: String,
	},
	Scored {
		average: f64,
		total: f64,
		windows: usize,
		text: String,
	},
}

impl LineScore {
	/// The normalized text that was scored.
	pub fn text(&self) -> &str {
		match self {
			LineScore::Degenerate { text } | LineScore::Scored { text, .. } => text,
		}
	}
}

/// Tab-separated output line, without the trailing newline.
///
/// `<avg>\t<total>\t<windows>\t<text>` or `0.000000\t<text>`.
impl fmt::Display for LineScore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LineScore::Degenerate { text } => write!(f, "{:.6}\t{}", 0.0, text),
			LineScore::Scored { average, total, windows, text } => {
				write!(f, "{average:.6}\t{total:.6}\t{windows}\t{text}")
			}
		}
	}
}

/// Scores text lines against a trained `ModelSet`.
///
/// Every window of the set's maximum order is fed to the backoff
/// estimator, which itself degrades to shorter suffixes as needed.
pub struct Scorer<'a> {
	models: &'a ModelSet,
	order: usize,
}

impl<'a> Scorer<'a> {
	pub fn new(models: &'a ModelSet) -> Self {
		Self { models, order: models.max_order() }
	}

	/// Window length used for scoring.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Normalizes and scores one line.
	pub fn score_line(&self, line: &str) -> LineScore {
		let text = normalize_line(line).into_owned();
		let chars: Vec<char> = text.chars().collect();
		let keys = windows(&chars, self.order);
		if keys.is_empty() {
			return LineScore::Degenerate { text };
		}

		let total: f64 = keys.iter().map(|key| self.models.log_prob(key).value).sum();
		LineScore::Scored {
			average: total / keys.len() as f64,
			total,
			windows: keys.len(),
			text,
		}
	}

	/// Scores every line of `reader`, writing one result line per input line.
	///
	/// Bytes that are not valid UTF-8 are replaced with U+FFFD before
	/// scoring. Returns the number of lines scored.
	///
	/// # Errors
	/// Returns `NGramError::Stream` if reading or writing fails.
	pub fn score_reader<R: BufRead, W: Write>(&self, mut reader: R, writer: &mut W) -> Result<usize> {
		let mut line_count = 0;
		let mut buf = Vec::new();
		while read_line_bytes(&mut reader, &mut buf)? {
			writeln!(writer, "{}", self.score_line(&String::from_utf8_lossy(&buf)))?;
			line_count += 1;
		}
		info!("scored {line_count} lines with order {}", self.order);
		Ok(line_count)
	}
}
