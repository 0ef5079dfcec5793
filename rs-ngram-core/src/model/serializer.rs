use std::io::{BufRead, Write};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::model_set::ModelSet;
use crate::config::ModelFormat;
use crate::error::Result;
use crate::io::read_line_bytes;

/// One persisted entry: the count of `ngram` in the model of order `size`.
///
/// Models are stored as a flat list of records; totals are never written
/// and are rebuilt by summing the counts on read.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelRecord {
	pub size: usize,
	pub ngram: String,
	pub count: f64,
}

impl ModelRecord {
	/// Parses a `<size>\t<ngram>\t<count>` line.
	///
	/// Returns `None` when the line does not have exactly three fields,
	/// when `ngram` is not `size` chars long, or when `count` is not a
	/// finite, nonnegative number.
	pub fn parse(line: &str) -> Option<Self> {
		let line = line.strip_suffix('\r').unwrap_or(line);
		let mut fields = line.split('\t');
		let size: usize = fields.next()?.parse().ok()?;
		let ngram = fields.next()?;
		let count: f64 = fields.next()?.trim().parse().ok()?;
		if fields.next().is_some() {
			return None;
		}
		if ngram.chars().count() != size || !count.is_finite() || count < 0.0 {
			return None;
		}
		Some(Self { size, ngram: ngram.to_owned(), count })
	}
}

/// What happened to the records fed to a read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadStats {
	/// Records stored into a model
	pub applied: usize,
	/// Well-formed records whose size has no model in the target set
	pub dropped: usize,
	/// Lines that could not be parsed (text format only)
	pub malformed: usize,
}

/// Flattens `models` into records, sorted by size then n-gram.
pub fn records(models: &ModelSet) -> Vec<ModelRecord> {
	let mut records = Vec::new();
	for model in models.models() {
		let mut entries: Vec<(&str, f64)> = model.iter().collect();
		entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
		records.extend(entries.into_iter().map(|(ngram, count)| ModelRecord {
			size: model.size(),
			ngram: ngram.to_owned(),
			count,
		}));
	}
	records
}

/// Stores one record into the model of matching size.
///
/// The count overwrites any previous value for the n-gram while the
/// model total always grows by `count`. Returns `false` when the set has
/// no model of that size.
pub fn apply(models: &mut ModelSet, record: ModelRecord) -> bool {
	match models.get_mut(record.size) {
		Some(model) => {
			model.restore(record.ngram, record.count);
			true
		}
		None => false,
	}
}

/// Writes every record as a `<size>\t<ngram>\t<count>` line.
///
/// Counts use the shortest decimal form that parses back to the same
/// `f64`. Very large or very small counts come out in exponent form
/// (`1e-300`, `1e20`); integral counts always carry a `.0`.
/// Returns the number of lines written.
pub fn dump<W: Write>(models: &ModelSet, writer: &mut W) -> Result<usize> {
	let records = records(models);
	for record in &records {
		writeln!(writer, "{}\t{}\t{:?}", record.size, record.ngram, record.count)?;
	}
	debug!("dumped {} records", records.len());
	Ok(records.len())
}

/// Reads text records into an already sized set.
///
/// Malformed lines, including lines that are not valid UTF-8, are
/// skipped and records for missing sizes dropped; neither aborts the read.
///
/// # Errors
/// Returns `NGramError::Stream` only when the underlying reader fails.
pub fn read<R: BufRead>(models: &mut ModelSet, mut reader: R) -> Result<ReadStats> {
	let mut stats = ReadStats::default();
	let mut buf = Vec::new();
	while read_line_bytes(&mut reader, &mut buf)? {
		let Ok(line) = std::str::from_utf8(&buf) else {
			debug!("skipping non UTF-8 model line {:?}", String::from_utf8_lossy(&buf));
			stats.malformed += 1;
			continue;
		};
		match ModelRecord::parse(line) {
			Some(record) => {
				if apply(models, record) {
					stats.applied += 1;
				} else {
					stats.dropped += 1;
				}
			}
			None => {
				debug!("skipping malformed model line {line:?}");
				stats.malformed += 1;
			}
		}
	}
	Ok(stats)
}

/// Writes the records as a single `postcard` snapshot.
///
/// Returns the number of records written.
pub fn save_snapshot<W: Write>(models: &ModelSet, writer: &mut W) -> Result<usize> {
	let records = records(models);
	let bytes = postcard::to_stdvec(&records)?;
	writer.write_all(&bytes)?;
	debug!("saved snapshot of {} records ({} bytes)", records.len(), bytes.len());
	Ok(records.len())
}

/// Reads a `postcard` snapshot into an already sized set.
///
/// Records go through `apply`, so a snapshot obeys the same overwrite and
/// drop rules as the text format.
///
/// # Errors
/// Fails if the stream cannot be read or is not a valid snapshot.
pub fn load_snapshot<R: BufRead>(models: &mut ModelSet, mut reader: R) -> Result<ReadStats> {
	let mut bytes = Vec::new();
	reader.read_to_end(&mut bytes)?;
	let records: Vec<ModelRecord> = postcard::from_bytes(&bytes)?;

	let mut stats = ReadStats::default();
	for record in records {
		if apply(models, record) {
			stats.applied += 1;
		} else {
			stats.dropped += 1;
		}
	}
	Ok(stats)
}

/// Persists `models` in the requested format.
pub fn write_model<W: Write>(models: &ModelSet, format: ModelFormat, writer: &mut W) -> Result<usize> {
	let written = match format {
		ModelFormat::Text => dump(models, writer)?,
		ModelFormat::Binary => save_snapshot(models, writer)?,
	};
	info!("wrote {written} model records ({format:?})");
	Ok(written)
}

/// Loads a persisted model in the requested format into `models`.
pub fn read_model<R: BufRead>(models: &mut ModelSet, format: ModelFormat, reader: R) -> Result<ReadStats> {
	let stats = match format {
		ModelFormat::Text => read(models, reader)?,
		ModelFormat::Binary => load_snapshot(models, reader)?,
	};
	info!(
		"read {} model records ({} dropped, {} malformed)",
		stats.applied, stats.dropped, stats.malformed
	);
	Ok(stats)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::NGramError;

	fn trained(order: usize, lines: &[&str]) -> ModelSet {
		let mut set = ModelSet::new(order).unwrap();
		set.train(lines);
		set
	}

	fn assert_same(a: &ModelSet, b: &ModelSet) {
		assert_eq!(a.max_order(), b.max_order());
		for model in a.models() {
			let other = b.get(model.size()).unwrap();
			assert_eq!(model.total().to_bits(), other.total().to_bits());
			assert_eq!(model.len(), other.len());
			for (ngram, count) in model.iter() {
				assert_eq!(other.count(ngram).map(f64::to_bits), Some(count.to_bits()));
			}
		}
	}

	#[test]
	fn parse_accepts_spaces_inside_ngram() {
		let record = ModelRecord::parse("3\ta b\t2.0").unwrap();
		assert_eq!(record, ModelRecord { size: 3, ngram: "a b".to_owned(), count: 2.0 });
		assert_eq!(ModelRecord::parse("1\tx\t4\r").unwrap().count, 4.0);
	}

	#[test]
	fn parse_rejects_malformed_lines() {
		for line in [
			"",
			"garbage",
			"x\tab\t1.0",
			"2\tab",
			"2\tab\tnope",
			"2\tabc\t1.0",
			"2\tab\t1.0\textra",
			"2\tab\t-1.0",
			"2\tab\tNaN",
			"2\tab\tinf",
		] {
			assert!(ModelRecord::parse(line).is_none(), "{line:?}");
		}
	}

	#[test]
	fn dump_is_sorted_and_has_no_totals() {
		let set = trained(2, &["abab"]);
		let mut out = Vec::new();
		assert_eq!(dump(&set, &mut out).unwrap(), 4);
		let text = String::from_utf8(out).unwrap();
		assert_eq!(text, "1\ta\t2.0\n1\tb\t2.0\n2\tab\t2.0\n2\tba\t1.0\n");
	}

	#[test]
	fn dump_then_read_reproduces_counts_and_totals() {
		let set = trained(3, &["correct horse", "battery  staple", "abab", "é ö"]);
		let mut out = Vec::new();
		dump(&set, &mut out).unwrap();

		let mut restored = ModelSet::new(3).unwrap();
		let stats = read(&mut restored, out.as_slice()).unwrap();
		assert_eq!(stats.malformed, 0);
		assert_eq!(stats.dropped, 0);
		assert_same(&set, &restored);
	}

	#[test]
	fn fractional_counts_survive_text_round_trip() {
		let mut set = ModelSet::new(1).unwrap();
		apply(&mut set, ModelRecord { size: 1, ngram: "a".into(), count: 0.1 + 0.2 });
		apply(&mut set, ModelRecord { size: 1, ngram: "b".into(), count: 1e-300 });

		let mut out = Vec::new();
		dump(&set, &mut out).unwrap();
		let mut restored = ModelSet::new(1).unwrap();
		read(&mut restored, out.as_slice()).unwrap();
		assert_same(&set, &restored);
	}

	#[test]
	fn read_skips_malformed_and_drops_unknown_sizes() {
		let input = "1\ta\t2.0\nnot a record\n4\tabcd\t1.0\n2\tab\t3.0\n";
		let mut set = ModelSet::new(2).unwrap();
		let stats = read(&mut set, input.as_bytes()).unwrap();

		assert_eq!(stats, ReadStats { applied: 2, dropped: 1, malformed: 1 });
		assert_eq!(set.get(1).unwrap().count("a"), Some(2.0));
		assert_eq!(set.get(2).unwrap().total(), 3.0);
	}

	#[test]
	fn read_skips_invalid_utf8_and_keeps_going() {
		let mut input = b"1\ta\t2.0\n".to_vec();
		input.extend_from_slice(b"1\t\xff\t1.0\n");
		input.extend_from_slice(b"1\tb\t3.0\n");

		let mut set = ModelSet::new(1).unwrap();
		let stats = read(&mut set, input.as_slice()).unwrap();

		assert_eq!(stats, ReadStats { applied: 2, dropped: 0, malformed: 1 });
		let model = set.get(1).unwrap();
		assert_eq!(model.count("a"), Some(2.0));
		assert_eq!(model.count("b"), Some(3.0));
		assert_eq!(model.total(), 5.0);
	}

	#[test]
	fn extreme_counts_use_exponent_form() {
		let mut set = ModelSet::new(1).unwrap();
		apply(&mut set, ModelRecord { size: 1, ngram: "a".into(), count: 1e-300 });
		apply(&mut set, ModelRecord { size: 1, ngram: "b".into(), count: 3.0 });

		let mut out = Vec::new();
		dump(&set, &mut out).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "1\ta\t1e-300\n1\tb\t3.0\n");
	}

	#[test]
	fn repeated_key_overwrites_count_and_double_counts_total() {
		let input = "1\ta\t2.0\n1\ta\t5.0\n";
		let mut set = ModelSet::new(1).unwrap();
		read(&mut set, input.as_bytes()).unwrap();

		let model = set.get(1).unwrap();
		assert_eq!(model.count("a"), Some(5.0));
		assert_eq!(model.total(), 7.0);
	}

	#[test]
	fn reading_twice_double_counts_totals() {
		let set = trained(2, &["abab"]);
		let mut out = Vec::new();
		dump(&set, &mut out).unwrap();

		let mut restored = ModelSet::new(2).unwrap();
		read(&mut restored, out.as_slice()).unwrap();
		read(&mut restored, out.as_slice()).unwrap();
		let model = restored.get(2).unwrap();
		assert_eq!(model.count("ab"), Some(2.0));
		assert_eq!(model.total(), 6.0);
	}

	#[test]
	fn snapshot_round_trip() {
		let set = trained(3, &["letmein", "p@ssw0rd  123"]);
		let mut out = Vec::new();
		let written = write_model(&set, ModelFormat::Binary, &mut out).unwrap();
		assert_eq!(written, records(&set).len());

		let mut restored = ModelSet::new(3).unwrap();
		let stats = read_model(&mut restored, ModelFormat::Binary, out.as_slice()).unwrap();
		assert_eq!(stats.applied, written);
		assert_same(&set, &restored);
	}

	#[test]
	fn snapshot_into_smaller_set_drops_higher_orders() {
		let set = trained(3, &["abab"]);
		let mut out = Vec::new();
		save_snapshot(&set, &mut out).unwrap();

		let mut restored = ModelSet::new(1).unwrap();
		let stats = load_snapshot(&mut restored, out.as_slice()).unwrap();
		assert_eq!(stats.applied, 2);
		assert_eq!(stats.dropped, 4);
		assert_eq!(restored.get(1).unwrap().total(), 4.0);
	}

	#[test]
	fn corrupt_snapshot_is_an_error() {
		let mut set = ModelSet::new(2).unwrap();
		let result = load_snapshot(&mut set, &[0xff_u8, 0xff, 0xff][..]);
		assert!(matches!(result, Err(NGramError::Snapshot(_))));
	}
}
