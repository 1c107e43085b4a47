use std::path::PathBuf;

use geoskill_analysis::{
    per_time::Period,
    report::{GlobalReport, ReportOptions},
};
use geoskill_stats::classification::ClassificationMethod;

use crate::{
    command::GlobalArg,
    store::DifficultyStore,
    util::{Output, read_json_file},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum PeriodArg {
    Day,
    Week,
    Month,
}

impl From<PeriodArg> for Period {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Day => Self::Day,
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ClassificationArg {
    Equidistant,
    NestedMeans,
    Jenks,
}

impl From<ClassificationArg> for ClassificationMethod {
    fn from(method: ClassificationArg) -> Self {
        match method {
            ClassificationArg::Equidistant => Self::Equidistant,
            ClassificationArg::NestedMeans => Self::NestedMeans,
            ClassificationArg::Jenks => Self::Jenks,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    /// Answer log (CSV)
    answers: PathBuf,
    /// Difficulty store written by `difficulties`
    #[arg(long)]
    store: PathBuf,
    /// Report options file (JSON)
    #[arg(long)]
    options: Option<PathBuf>,
    /// Calendar period of the time series
    #[arg(long, value_enum)]
    period: Option<PeriodArg>,
    /// How to classify place difficulties
    #[arg(long, value_enum)]
    classification: Option<ClassificationArg>,
    /// Number of difficulty classes
    #[arg(long)]
    classes: Option<usize>,
    /// Output file (JSON) [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ReportArg {
    fn report_options(&self) -> anyhow::Result<ReportOptions> {
        let mut options = match &self.options {
            Some(path) => read_json_file("report options", path)?,
            None => ReportOptions::default(),
        };
        if let Some(period) = self.period {
            options.period = period.into();
        }
        if let Some(method) = self.classification {
            options.classification = method.into();
        }
        if let Some(classes) = self.classes {
            options.classes = classes;
        }
        Ok(options)
    }
}

pub(crate) fn run(global: &GlobalArg, arg: &ReportArg) -> anyhow::Result<()> {
    let options = arg.report_options()?;
    let estimator = global.estimator()?;
    let log = global.read_log(&arg.answers, estimator.config())?;
    let store = DifficultyStore::load(&arg.store, estimator.config())?;

    let report = GlobalReport::build(&log, &estimator, &store.places, &options);
    Output::save_json(&report, arg.output.clone())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    #[test]
    fn test_flags_override_report_options() {
        let args = CommandArgs::parse_from([
            "geoskill",
            "report",
            "answers.csv",
            "--store",
            "store.json",
            "--period",
            "week",
            "--classification",
            "nested-means",
        ]);
        let Mode::Report(arg) = args.mode else {
            panic!("expected the report subcommand");
        };
        let options = arg.report_options().unwrap();
        assert_eq!(options.period, Period::Week);
        assert_eq!(options.classification, ClassificationMethod::NestedMeans);
        assert_eq!(options.classes, ReportOptions::default().classes);
    }
}
