//! Synthetic answer logs drawn from a known logistic model.
//!
//! Every user has a true skill and every place a true difficulty, both
//! logistic-distributed. A user answers correctly with the same guess-adjusted
//! probability the estimator assumes, plus a small bonus for every earlier
//! exposure to the place. Feeding the log back to `difficulties` shows how well
//! the estimator recovers the truth.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context as _, bail};
use chrono::{TimeDelta, TimeZone as _, Utc};
use geoskill_rating::{AnswerEvent, PlaceId, Timestamp, UserId, logistic};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{answer_csv, util::Output};

/// Skill gained at a place per earlier exposure to it.
const LEARNING_PER_EXPOSURE: f64 = 0.3;
/// Chance that the next answer starts a new session.
const NEW_SESSION_PROBABILITY: f64 = 0.08;
/// Chance that a wrong answer is a skip rather than another place.
const SKIP_PROBABILITY: f64 = 0.1;
/// Scale of the logistic distribution of true skills and difficulties.
const RATING_SCALE: f64 = 1.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of users
    #[arg(long, default_value_t = 200)]
    users: u32,
    /// Number of places
    #[arg(long, default_value_t = 50)]
    places: u32,
    /// Number of answers per user
    #[arg(long, default_value_t = 40)]
    answers: u32,
    /// Options offered per question; 0 asks to find the place on the map
    #[arg(long, default_value_t = 4)]
    options: u32,
    /// Random seed [default: random]
    #[arg(long)]
    seed: Option<u64>,
    /// Output file for the true skills and difficulties (JSON)
    #[arg(long)]
    truth: Option<PathBuf>,
    /// Output file for the answer log (CSV) [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Ground truth behind a synthetic log.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct SimulationTruth {
    seed: u64,
    skills: BTreeMap<UserId, f64>,
    difficulties: BTreeMap<PlaceId, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shape {
    users: u32,
    places: u32,
    answers: u32,
    options: u32,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        users,
        places,
        answers,
        options,
        seed,
        truth,
        output,
    } = arg;
    if *users == 0 || *places == 0 {
        bail!("At least one user and one place are required");
    }
    let seed = seed.unwrap_or_else(rand::random);
    let shape = Shape {
        users: *users,
        places: *places,
        answers: *answers,
        options: *options,
    };

    let mut rng = Pcg32::seed_from_u64(seed);
    let (events, truth_data) = simulate(shape, seed, &mut rng);
    tracing::info!(seed, answers = events.len(), "answer log simulated");

    let mut writer = Output::from_output_path(output.clone())?;
    answer_csv::write_answers(&mut writer, &events)
        .with_context(|| format!("Failed to write answers to {}", writer.display_path()))?;
    if let Some(path) = truth {
        Output::save_json(&truth_data, Some(path.clone()))?;
    }
    Ok(())
}

fn draw_rating<R>(rng: &mut R) -> f64
where
    R: Rng,
{
    let u: f64 = rng.random_range(0.001..0.999);
    RATING_SCALE * (u / (1.0 - u)).ln()
}

fn simulate<R>(shape: Shape, seed: u64, rng: &mut R) -> (Vec<AnswerEvent>, SimulationTruth)
where
    R: Rng,
{
    let skills = (1..=shape.users)
        .map(|user| (UserId(user), draw_rating(rng)))
        .collect::<BTreeMap<_, _>>();
    let difficulties = (1..=shape.places)
        .map(|place| (PlaceId(place), draw_rating(rng)))
        .collect::<BTreeMap<_, _>>();
    let guess = if shape.options == 0 {
        0.0
    } else {
        1.0 / f64::from(shape.options)
    };
    let epoch = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).single().unwrap_or_default();

    let mut events = vec![];
    for (&user, &skill) in &skills {
        let mut time = epoch + TimeDelta::minutes(rng.random_range(0..60 * 24 * 60));
        let mut exposures = BTreeMap::<PlaceId, u32>::new();
        for _ in 0..shape.answers {
            let place = PlaceId(rng.random_range(1..=shape.places));
            let seen = exposures.entry(place).or_default();
            let knowledge =
                skill - difficulties[&place] + LEARNING_PER_EXPOSURE * f64::from(*seen);
            *seen += 1;

            let correct = rng.random_bool(guess + (1.0 - guess) * logistic(knowledge));
            let answered = if correct {
                Some(place)
            } else {
                mistake(place, shape.places, rng)
            };
            let response_time_ms = if correct {
                rng.random_range(1500..6000)
            } else {
                rng.random_range(3000..12_000)
            };
            time = advance(time, response_time_ms, rng);
            events.push(AnswerEvent::new(
                user,
                place,
                answered,
                shape.options,
                response_time_ms,
                time,
            ));
        }
    }
    events.sort_by_key(|event| event.timestamp);

    let truth = SimulationTruth {
        seed,
        skills,
        difficulties,
    };
    (events, truth)
}

fn mistake<R>(place: PlaceId, places: u32, rng: &mut R) -> Option<PlaceId>
where
    R: Rng,
{
    if places < 2 || rng.random_bool(SKIP_PROBABILITY) {
        return None;
    }
    let other = rng.random_range(1..places);
    Some(PlaceId(if other >= place.0 { other + 1 } else { other }))
}

fn advance<R>(time: Timestamp, response_time_ms: u64, rng: &mut R) -> Timestamp
where
    R: Rng,
{
    let pause = if rng.random_bool(NEW_SESSION_PROBABILITY) {
        TimeDelta::hours(rng.random_range(1..72))
    } else {
        TimeDelta::seconds(rng.random_range(1..20))
    };
    let response = TimeDelta::milliseconds(i64::try_from(response_time_ms).unwrap_or(i64::MAX));
    time + response + pause
}
