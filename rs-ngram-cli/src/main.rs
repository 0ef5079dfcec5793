//! rs-ngram - character n-gram predictability scoring
//!
//! Trains a character n-gram model from a corpus, or scores lines of text
//! (typically passwords) against a trained model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use rs_ngram_core::config::DEFAULT_ORDER;
use rs_ngram_core::runner::{self, RunSummary};
use rs_ngram_core::{Config, Mode, ModelFormat};

/// Parse and validate the n-gram order (>= 1)
fn parse_order(s: &str) -> Result<usize, String> {
	let n: usize = s
		.parse()
		.map_err(|_| format!("'{}' is not a valid number", s))?;
	if n == 0 {
		Err("ngram size must be at least 1".to_string())
	} else {
		Ok(n)
	}
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
	/// `<size>\t<ngram>\t<count>` lines
	Text,
	/// Compact binary snapshot
	Binary,
}

impl From<Format> for ModelFormat {
	fn from(format: Format) -> Self {
		match format {
			Format::Text => ModelFormat::Text,
			Format::Binary => ModelFormat::Binary,
		}
	}
}

/// Character n-gram model: train on a corpus or score lines by log-probability
#[derive(Parser, Debug)]
#[command(
	name = "rs-ngram",
	version,
	after_help = "\
Examples:
  rs-ngram --train --in corpus.txt --model model.txt
  rs-ngram --predict --model model.txt --in candidates.txt
  rs-ngram --train --ngram-size 4 --format binary < corpus.txt > model.bin

Predict output: <avg log2 prob>\\t<total>\\t<windows>\\t<text>, or 0.000000\\t<text>
for lines shorter than the ngram size."
)]
struct Cli {
	/// Train a model from the input corpus
	#[arg(long)]
	train: bool,

	/// Score input lines against a trained model
	#[arg(long)]
	predict: bool,

	/// Maximum n-gram size
	#[arg(long, visible_alias = "ngram_size", default_value_t = DEFAULT_ORDER, value_parser = parse_order)]
	ngram_size: usize,

	/// Input file (default: stdin)
	#[arg(long = "in")]
	input: Option<PathBuf>,

	/// Output file for scores (default: stdout)
	#[arg(long = "out")]
	output: Option<PathBuf>,

	/// Model file (default: stdout when training, stdin when predicting)
	#[arg(long)]
	model: Option<PathBuf>,

	/// Model file encoding
	#[arg(long, value_enum, default_value = "text")]
	format: Format,
}

impl Cli {
	fn into_config(self) -> rs_ngram_core::Result<Config> {
		let mode = Mode::from_flags(self.train, self.predict)?;
		Ok(Config::new(mode, self.ngram_size)?
			.with_input(self.input)
			.with_output(self.output)
			.with_model(self.model)
			.with_format(self.format.into()))
	}
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let config = Cli::parse().into_config().context("invalid configuration")?;
	match runner::run(&config).context("run failed")? {
		RunSummary::Trained { lines, records } => {
			info!("trained on {lines} lines, wrote {records} records")
		}
		RunSummary::Predicted { records, lines } => {
			info!("loaded {records} records, scored {lines} lines")
		}
	}
	Ok(())
}
