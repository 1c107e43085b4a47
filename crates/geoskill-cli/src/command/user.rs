use std::path::PathBuf;

use anyhow::bail;
use geoskill_analysis::report::UserReport;
use geoskill_rating::UserId;

use crate::{command::GlobalArg, store::DifficultyStore, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct UserArg {
    /// Answer log (CSV)
    answers: PathBuf,
    /// Difficulty store written by `difficulties`
    #[arg(long)]
    store: PathBuf,
    /// Users to report on
    #[arg(long = "user", required = true, num_args = 1..)]
    users: Vec<UserId>,
    /// Output file (JSON) [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(global: &GlobalArg, arg: &UserArg) -> anyhow::Result<()> {
    let UserArg {
        answers,
        store,
        users,
        output,
    } = arg;
    let estimator = global.estimator()?;
    let log = global.read_log(answers, estimator.config())?;
    let store = DifficultyStore::load(store, estimator.config())?;

    let mut reports = vec![];
    for user in users {
        let Some(history) = log.user(*user) else {
            bail!("User {user} has no answers in {}", answers.display());
        };
        tracing::debug!(%user, answers = history.len(), "estimating user");
        reports.push(UserReport::build(history, &estimator, &store.places));
    }
    Output::save_json(&reports, output.clone())
}
