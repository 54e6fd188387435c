//! Headless Task Runner
//!
//! Drives oculomotor tasks with a random-saccade agent and prints per-episode
//! scores as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use oculomotor::core::types::task_rng;
use oculomotor::environment::Environment;
use oculomotor::{EnvConfig, Result, TaskKind, TrialResult};
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

/// Headless Task Runner - random-saccade baseline for every task
#[derive(Parser, Debug)]
#[command(name = "task_runner")]
#[command(about = "Run oculomotor tasks headless and report episode scores")]
struct Args {
    /// Task name (point_to_target, change_detection, odd_one_out,
    /// visual_search, multiple_object_tracking, random_dot_motion)
    #[arg(long, default_value = "point_to_target")]
    task: String,

    /// Fixed difficulty level; sampled per trial when omitted
    #[arg(long)]
    difficulty: Option<u32>,

    /// Number of episodes, run in parallel
    #[arg(long, default_value_t = 4)]
    episodes: u64,

    /// Episode length in ticks (overrides the config)
    #[arg(long)]
    steps: Option<u32>,

    /// Base random seed; episode `i` uses `seed + i`
    #[arg(long)]
    seed: Option<u64>,

    /// Environment config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probability of starting a saccade on any tick
    #[arg(long, default_value_t = 0.1)]
    saccade_rate: f64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct EpisodeSummary {
    episode: u64,
    seed: u64,
    steps: u32,
    total_reward: u32,
    trials: u32,
    successes: u32,
    mean_reaction_step: Option<f64>,
}

#[derive(Serialize)]
struct RunSummary {
    task: TaskKind,
    difficulty: Option<u32>,
    episodes: Vec<EpisodeSummary>,
}

/// Jumps to a random gaze target now and then, sometimes back to the centre.
struct SaccadeAgent {
    rate: f64,
    max_h: f32,
    max_v: f32,
}

impl SaccadeAgent {
    fn act(&self, angles: (f32, f32), rng: &mut impl Rng) -> [f32; 2] {
        if !rng.gen_bool(self.rate) {
            return [0.0, 0.0];
        }
        let (h, v) = angles;
        let (target_h, target_v) = if rng.gen_bool(0.3) {
            (0.0, 0.0)
        } else {
            (
                rng.gen_range(-self.max_h..=self.max_h),
                rng.gen_range(-self.max_v..=self.max_v),
            )
        };
        [target_h - h, target_v - v]
    }
}

fn run_episode(
    kind: TaskKind,
    args: &Args,
    base: &EnvConfig,
    episode: u64,
    seed: u64,
) -> Result<EpisodeSummary> {
    let config = EnvConfig {
        seed: Some(seed),
        ..base.clone()
    };
    let agent = SaccadeAgent {
        rate: args.saccade_rate,
        max_h: config.camera.max_angle_h,
        max_v: config.camera.max_angle_v,
    };
    let mut agent_rng = task_rng(Some(seed.wrapping_mul(31).wrapping_add(7)));
    let mut env = Environment::for_task(kind, args.difficulty, config)?;
    let mut observation = env.reset();

    let mut summary = EpisodeSummary {
        episode,
        seed,
        steps: 0,
        total_reward: 0,
        trials: 0,
        successes: 0,
        mean_reaction_step: None,
    };
    let mut reaction_total = 0u64;

    loop {
        let action = agent.act(observation.angle, &mut agent_rng);
        let result = env.step(&action)?;
        summary.steps += 1;
        summary.total_reward += result.reward;
        if let Some(info) = result.info {
            summary.trials += 1;
            reaction_total += u64::from(info.reaction_step);
            if info.result == TrialResult::Success {
                summary.successes += 1;
            }
        }
        observation = result.observation;
        if result.done {
            break;
        }
    }

    if summary.trials > 0 {
        summary.mean_reaction_step = Some(reaction_total as f64 / f64::from(summary.trials));
    }
    tracing::info!(
        episode,
        reward = summary.total_reward,
        trials = summary.trials,
        "Episode finished"
    );
    Ok(summary)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let kind: TaskKind = args.task.parse()?;

    let mut base = match &args.config {
        Some(path) => EnvConfig::load(path)?,
        None => EnvConfig::default(),
    };
    if let Some(steps) = args.steps {
        base.max_step_count = steps;
        base.validate()?;
    }

    let seed = args.seed.or(base.seed).unwrap_or_else(rand::random);
    tracing::info!(task = %kind, episodes = args.episodes, seed, "Starting run");

    let episodes = (0..args.episodes)
        .into_par_iter()
        .map(|episode| run_episode(kind, &args, &base, episode, seed.wrapping_add(episode)))
        .collect::<Result<Vec<_>>>()?;

    let summary = RunSummary {
        task: kind,
        difficulty: args.difficulty,
        episodes,
    };

    match args.format.as_str() {
        "text" => {
            println!("Task Run");
            println!("========");
            println!("Task: {}", summary.task);
            match summary.difficulty {
                Some(d) => println!("Difficulty: {d}"),
                None => println!("Difficulty: sampled"),
            }
            for ep in &summary.episodes {
                let reaction = ep
                    .mean_reaction_step
                    .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
                println!(
                    "Episode {} (seed {}): reward {} over {} trials, {} successes, mean reaction {}",
                    ep.episode, ep.seed, ep.total_reward, ep.trials, ep.successes, reaction
                );
            }
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{other}', defaulting to json");
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
