use std::io::Write;

use log::{info, warn};

use crate::config::{Config, Mode};
use crate::error::Result;
use crate::io::{create_writer, open_reader};
use crate::model::model_set::ModelSet;
use crate::model::scorer::Scorer;
use crate::model::serializer::{read_model, write_model};

/// What a completed run processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunSummary {
	/// Corpus lines used and model records written
	Trained { lines: usize, records: usize },
	/// Model records loaded and input lines scored
	Predicted { records: usize, lines: usize },
}

/// Executes one train or predict run as described by `config`.
///
/// Every file is opened once and closed when its reader or writer goes
/// out of scope, on success and on early error alike.
///
/// # Errors
/// - A configured path cannot be opened or created
/// - A stream fails while reading or writing
/// - A binary model cannot be decoded
pub fn run(config: &Config) -> Result<RunSummary> {
	info!(
		"{:?} with order {} (in: {:?}, out: {:?}, model: {:?}, format: {:?})",
		config.mode(),
		config.order(),
		config.input(),
		config.output(),
		config.model(),
		config.format()
	);
	match config.mode() {
		Mode::Train => train(config),
		Mode::Predict => predict(config),
	}
}

fn train(config: &Config) -> Result<RunSummary> {
	let mut models = ModelSet::new(config.order())?;

	let input = open_reader(config.input())?;
	let mut model_out = create_writer(config.model())?;

	let lines = models.train_reader(input)?;
	let records = write_model(&models, config.format(), &mut model_out)?;
	model_out.flush()?;

	Ok(RunSummary::Trained { lines, records })
}

fn predict(config: &Config) -> Result<RunSummary> {
	let mut models = ModelSet::new(config.order())?;

	if config.model().is_none() && config.input().is_none() {
		warn!("model and input both read from standard input, input lines follow the model");
	}
	let stats = {
		let model_in = open_reader(config.model())?;
		read_model(&mut models, config.format(), model_in)?
	};

	let input = open_reader(config.input())?;
	let mut output = create_writer(config.output())?;
	let lines = Scorer::new(&models).score_reader(input, &mut output)?;
	output.flush()?;

	Ok(RunSummary::Predicted { records: stats.applied, lines })
}
