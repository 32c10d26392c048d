//! Train command - Train the paddle agent against a scripted opponent

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::AgentConfig,
    cli::output::{format_number, print_kv, print_section},
    pipeline::{
        JsonlObserver, MetricsObserver, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
    pong::{ControllerKind, Side},
    q_learning::{Difficulty, DifficultyProfile},
};

/// Table file used when `--table` is not given.
pub const DEFAULT_TABLE_PATH: &str = "pong_q_table.dat";

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    difficulty: Difficulty,
    profile: DifficultyProfile,
    opponent: ControllerKind,
    agent_side: Side,
    dt: f32,
    seed: Option<u64>,
    table: PathBuf,
    saved: bool,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning paddle")]
pub struct TrainArgs {
    /// Difficulty profile (learning rate, discount, exploration)
    #[arg(long, short = 'd', value_enum, default_value_t = Difficulty::Easy)]
    pub difficulty: Difficulty,

    /// Override the profile's learning rate
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Override the profile's discount factor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Override the profile's exploration rate
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Opponent driving the other paddle
    #[arg(long, short = 'o', value_enum, default_value_t = ControllerKind::Tracking)]
    pub opponent: ControllerKind,

    /// Number of points to play
    #[arg(long, short = 'p', default_value_t = 100)]
    pub points: usize,

    /// Points needed to win a match
    #[arg(long, default_value_t = 10)]
    pub points_to_win: u32,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Ticks after which an undecided point is abandoned
    #[arg(long, default_value_t = 10_000)]
    pub max_ticks: usize,

    /// Q-table file to load before and save after training
    #[arg(long, short = 't', default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Do not write the table back after training
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for per-point JSONL records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

impl TrainArgs {
    fn profile(&self) -> Result<Option<DifficultyProfile>> {
        if self.alpha.is_none() && self.gamma.is_none() && self.epsilon.is_none() {
            return Ok(None);
        }
        let base = self.difficulty.profile();
        let profile = DifficultyProfile::custom(
            self.alpha.unwrap_or(base.alpha),
            self.gamma.unwrap_or(base.gamma),
            self.epsilon.unwrap_or(base.epsilon),
        )?;
        Ok(Some(profile))
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    if args.points == 0 {
        return Err(anyhow!("--points must be at least 1"));
    }

    let mut agent_config = AgentConfig::new(args.difficulty);
    if let Some(profile) = args.profile()? {
        agent_config = agent_config.with_profile(profile);
    }
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }
    let (mut agent, discretizer) = agent_config.build()?;

    if args.table.exists() {
        match agent.load_with_report(&args.table) {
            Ok(report) => println!(
                "Loaded {} states from {} ({} malformed lines skipped)",
                format_number(report.states_loaded),
                args.table.display(),
                report.parse_errors
            ),
            Err(e) => {
                log::warn!("could not load Q-table, starting fresh: {e}");
                println!("⚠️  Could not read {}, starting fresh", args.table.display());
            }
        }
    } else {
        println!("No table at {}, starting fresh", args.table.display());
    }

    let config = TrainingConfig {
        num_points: args.points,
        dt: args.dt,
        max_ticks_per_point: args.max_ticks,
        points_to_win: args.points_to_win,
        agent_side: agent_config.side,
        opponent: args.opponent,
        seed: args.seed,
    };

    let mut pipeline = TrainingPipeline::new(config);
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }
    pipeline = pipeline.with_observer(Box::new(MetricsObserver::new()));

    let result = pipeline.run(&mut agent, &discretizer)?;

    print_section("Training Complete");
    print_kv("Difficulty", &agent.profile().to_string());
    print_kv("Opponent", args.opponent.as_str());
    print_kv("Points", &format_number(result.total_points));
    print_kv(
        "Agent / opponent",
        &format!("{} / {}", result.agent_points, result.opponent_points),
    );
    print_kv("Unfinished", &result.unfinished_points.to_string());
    print_kv("Win rate", &format!("{:.1}%", result.win_rate * 100.0));
    print_kv("Returns", &format_number(result.agent_returns));
    print_kv("Ticks", &format_number(result.ticks));
    print_kv("Total reward", &format!("{:.1}", result.total_reward));
    print_kv("States explored", &format_number(result.explored_states));

    let saved = if args.no_save {
        false
    } else {
        match agent.save_table(&args.table) {
            Ok(count) => {
                println!(
                    "\n✓ Saved {} states to {}",
                    format_number(count),
                    args.table.display()
                );
                true
            }
            Err(e) => {
                log::warn!("could not save Q-table: {e}");
                eprintln!("Error saving Q-table: {e}");
                false
            }
        }
    };

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }
        if let Some(parent) = summary_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let summary = TrainingSummaryFile {
            training: result,
            metadata: SummaryMetadata {
                difficulty: agent.difficulty(),
                profile: agent.profile(),
                opponent: args.opponent,
                agent_side: agent_config.side,
                dt: args.dt,
                seed: args.seed,
                table: args.table.clone(),
                saved,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary.JSON")),
            PathBuf::from("out/summary.JSON")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            Path::new("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_profile_overrides() {
        let args = TrainArgs::parse_from(["train", "--difficulty", "hard", "--epsilon", "0"]);
        let profile = args.profile().unwrap().unwrap();
        assert_eq!(profile.alpha, 0.2);
        assert_eq!(profile.gamma, 0.95);
        assert_eq!(profile.epsilon, 0.0);

        let args = TrainArgs::parse_from(["train"]);
        assert!(args.profile().unwrap().is_none());

        let args = TrainArgs::parse_from(["train", "--alpha", "2"]);
        assert!(args.profile().is_err());
    }

    #[test]
    fn test_execute_writes_table_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("table.dat");
        let summary = dir.path().join("summary.json");
        let args = TrainArgs::parse_from([
            "train",
            "--points",
            "2",
            "--seed",
            "5",
            "--table",
            table.to_str().unwrap(),
            "--summary",
            summary.to_str().unwrap(),
        ]);

        execute(args).unwrap();

        assert!(table.exists());
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(json["training"]["total_points"], 2);
        assert_eq!(json["metadata"]["difficulty"], "easy");
        assert_eq!(json["metadata"]["saved"], true);
    }

    #[test]
    fn test_unreadable_table_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the table file should be cannot be read or written
        let table = dir.path().join("table.dat");
        std::fs::create_dir(&table).unwrap();
        let summary = dir.path().join("summary.json");
        let args = TrainArgs::parse_from([
            "train",
            "--points",
            "1",
            "--seed",
            "2",
            "--table",
            table.to_str().unwrap(),
            "--summary",
            summary.to_str().unwrap(),
        ]);

        execute(args).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(json["training"]["total_points"], 1);
        assert_eq!(json["metadata"]["saved"], false);
    }

    #[test]
    fn test_no_save_leaves_table_absent() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("table.dat");
        let args = TrainArgs::parse_from([
            "train",
            "--points",
            "1",
            "--seed",
            "1",
            "--no-save",
            "--table",
            table.to_str().unwrap(),
        ]);
        execute(args).unwrap();
        assert!(!table.exists());
    }
}
