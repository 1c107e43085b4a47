use std::path::PathBuf;

use geoskill_analysis::report::{PlaceReport, ReportOptions};
use geoskill_rating::PlaceId;

use crate::{command::GlobalArg, store::DifficultyStore, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlaceArg {
    /// Answer log (CSV)
    answers: PathBuf,
    /// Difficulty store written by `difficulties`
    #[arg(long)]
    store: PathBuf,
    /// Places to report on
    #[arg(long = "place", required = true, num_args = 1..)]
    places: Vec<PlaceId>,
    /// Mistaken places answered less often than this portion are merged
    #[arg(long)]
    portion_threshold: Option<f64>,
    /// Output file (JSON) [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(global: &GlobalArg, arg: &PlaceArg) -> anyhow::Result<()> {
    let PlaceArg {
        answers,
        store,
        places,
        portion_threshold,
        output,
    } = arg;
    let estimator = global.estimator()?;
    let log = global.read_log(answers, estimator.config())?;
    let store = DifficultyStore::load(store, estimator.config())?;
    let mut options = ReportOptions::default();
    if let Some(threshold) = portion_threshold {
        options.portion_threshold = Some(*threshold);
    }

    let reports = places
        .iter()
        .map(|&place| {
            let report = PlaceReport::build(&log, place, &estimator, &store.places, &options);
            if report.answers == 0 {
                tracing::warn!(%place, "place was never asked");
            }
            report
        })
        .collect::<Vec<_>>();
    Output::save_json(&reports, output.clone())
}
