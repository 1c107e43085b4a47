use std::path::PathBuf;

use crate::{command::GlobalArg, store::DifficultyStore};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DifficultiesArg {
    /// Answer log (CSV)
    answers: PathBuf,
    /// Output file for the difficulty store (JSON) [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(global: &GlobalArg, arg: &DifficultiesArg) -> anyhow::Result<()> {
    let DifficultiesArg { answers, output } = arg;
    let estimator = global.estimator()?;
    let log = global.read_log(answers, estimator.config())?;

    let ratings = estimator.compute_global_difficulties(&log);
    DifficultyStore::new(ratings, estimator.config()).save(output.clone())
}
