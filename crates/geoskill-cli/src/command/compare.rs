use std::path::PathBuf;

use geoskill_analysis::cohort;

use crate::{command::GlobalArg, store::DifficultyStore, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// Answer log of the first cohort (CSV)
    a: PathBuf,
    /// Answer log of the second cohort (CSV)
    b: PathBuf,
    /// Difficulty store written by `difficulties`
    #[arg(long)]
    store: PathBuf,
    /// Output file (JSON) [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(global: &GlobalArg, arg: &CompareArg) -> anyhow::Result<()> {
    let CompareArg {
        a,
        b,
        store,
        output,
    } = arg;
    let estimator = global.estimator()?;
    let log_a = global.read_log(a, estimator.config())?;
    let log_b = global.read_log(b, estimator.config())?;
    let store = DifficultyStore::load(store, estimator.config())?;

    let comparison = cohort::compare_prior_skill(&log_a, &log_b, &estimator, &store.places);
    if let Some(difference) = comparison.mean_difference {
        tracing::info!(difference, "mean prior skill of b minus a");
    }
    Output::save_json(&comparison, output.clone())
}
