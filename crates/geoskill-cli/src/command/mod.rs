use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use geoskill_rating::{AnswerLog, EstimatorConfig, KnowledgeEstimator};

use crate::{
    answer_csv,
    util::{self, read_json_file},
};

use self::{
    compare::CompareArg, difficulties::DifficultiesArg, place::PlaceArg, report::ReportArg,
    simulate::SimulateArg, user::UserArg,
};

mod compare;
mod difficulties;
mod place;
mod report;
mod simulate;
mod user;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    global: GlobalArg,
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

/// Options shared by every subcommand.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GlobalArg {
    /// Estimator configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Inactivity gap, in minutes, that starts a new session
    #[arg(long, global = true)]
    session_gap_mins: Option<i64>,
    /// Clamp ratings to [-bound, bound]
    #[arg(long, global = true)]
    rating_bound: Option<f64>,
    /// Skip malformed CSV rows instead of failing
    #[arg(long, global = true)]
    skip_invalid: bool,
    /// Log debug events
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArg {
    /// Loads the configuration file, if any, and applies the flag overrides.
    pub(crate) fn estimator_config(&self) -> anyhow::Result<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => read_json_file("estimator configuration", path)?,
            None => EstimatorConfig::default(),
        };
        if let Some(minutes) = self.session_gap_mins {
            config.session_gap_secs = minutes
                .checked_mul(60)
                .with_context(|| format!("Session gap of {minutes} minutes is out of range"))?;
        }
        if let Some(bound) = self.rating_bound {
            config.rating_bound = Some(bound);
        }
        config.validate().context("Invalid estimator configuration")?;
        tracing::debug!(?config, "estimator configuration");
        Ok(config)
    }

    pub(crate) fn estimator(&self) -> anyhow::Result<KnowledgeEstimator> {
        Ok(KnowledgeEstimator::new(self.estimator_config()?)?)
    }

    /// Reads an answer log and tags its sessions.
    pub(crate) fn read_log(
        &self,
        path: &Path,
        config: &EstimatorConfig,
    ) -> anyhow::Result<AnswerLog> {
        let events = answer_csv::read_answers(path, self.skip_invalid)?;
        let log = AnswerLog::from_events(events, &config.segmenter()?)
            .with_context(|| format!("Failed to build answer log: {}", path.display()))?;
        if log.is_empty() {
            bail!("No answers in {}", path.display());
        }
        tracing::info!(
            users = log.user_count(),
            answers = log.answer_count(),
            "answer log ready"
        );
        Ok(log)
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute global place difficulties and write the difficulty store
    Difficulties(#[clap(flatten)] DifficultiesArg),
    /// Estimate the prior and current knowledge of users
    User(#[clap(flatten)] UserArg),
    /// Report statistics of single places
    Place(#[clap(flatten)] PlaceArg),
    /// Report statistics of the whole answer log
    Report(#[clap(flatten)] ReportArg),
    /// Compare the prior skill of two cohorts
    Compare(#[clap(flatten)] CompareArg),
    /// Generate a synthetic answer log
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { global, mode } = CommandArgs::parse();
    util::init_tracing(global.verbose);
    match mode {
        Mode::Difficulties(arg) => difficulties::run(&global, &arg)?,
        Mode::User(arg) => user::run(&global, &arg)?,
        Mode::Place(arg) => place::run(&global, &arg)?,
        Mode::Report(arg) => report::run(&global, &arg)?,
        Mode::Compare(arg) => compare::run(&global, &arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
