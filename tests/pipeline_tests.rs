//! Tests for the point-based training pipeline

use std::sync::{Arc, Mutex};

use pong_qlearn::{
    Result,
    app::AgentConfig,
    pipeline::{
        JsonlObserver, MetricsObserver, Observer, PointSummary, PointWinner, TrainingConfig,
        TrainingPipeline, TrainingResult,
    },
    pong::{ControllerKind, Side},
    q_learning::Difficulty,
};
use tempfile::tempdir;

/// Records every notification it receives.
#[derive(Clone, Default)]
struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
    summaries: Arc<Mutex<Vec<PointSummary>>>,
}

impl Observer for RecordingObserver {
    fn on_training_start(&mut self, total_points: usize) -> Result<()> {
        self.events.lock().unwrap().push(format!("start {total_points}"));
        Ok(())
    }

    fn on_point_end(&mut self, point_num: usize, summary: &PointSummary) -> Result<()> {
        self.events.lock().unwrap().push(format!("point {point_num}"));
        self.summaries.lock().unwrap().push(*summary);
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.events.lock().unwrap().push("end".to_string());
        Ok(())
    }
}

#[test]
fn test_basic_training_run() {
    let (mut agent, discretizer) = AgentConfig::new(Difficulty::Medium)
        .with_seed(42)
        .build()
        .unwrap();
    let config = TrainingConfig {
        num_points: 10,
        seed: Some(42),
        ..TrainingConfig::default()
    };

    let result = TrainingPipeline::new(config)
        .run(&mut agent, &discretizer)
        .unwrap();

    assert_eq!(result.total_points, 10);
    assert_eq!(
        result.agent_points + result.opponent_points + result.unfinished_points,
        10
    );
    assert!(result.win_rate >= 0.0 && result.win_rate <= 1.0);
    assert!(result.explored_states > 0);
    assert!(!agent.has_pending());
}

#[test]
fn test_observers_are_notified_in_order() {
    let recorder = RecordingObserver::default();
    let (mut agent, discretizer) = AgentConfig::default().with_seed(3).build().unwrap();
    let config = TrainingConfig {
        num_points: 3,
        seed: Some(3),
        ..TrainingConfig::default()
    };

    let result = TrainingPipeline::new(config)
        .with_observer(Box::new(recorder.clone()))
        .run(&mut agent, &discretizer)
        .unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(events, ["start 3", "point 0", "point 1", "point 2", "end"]);

    let summaries = recorder.summaries.lock().unwrap();
    let ticks: usize = summaries.iter().map(|s| s.ticks).sum();
    let reward: f64 = summaries.iter().map(|s| s.reward).sum();
    assert_eq!(ticks, result.ticks);
    assert!((reward - result.total_reward).abs() < 1e-9);
}

#[test]
fn test_concedes_are_penalised() {
    let recorder = RecordingObserver::default();
    let (mut agent, discretizer) = AgentConfig::new(Difficulty::Hard)
        .with_seed(8)
        .build()
        .unwrap();
    let config = TrainingConfig {
        num_points: 20,
        seed: Some(8),
        opponent: ControllerKind::Tracking,
        ..TrainingConfig::default()
    };

    TrainingPipeline::new(config)
        .with_observer(Box::new(recorder.clone()))
        .run(&mut agent, &discretizer)
        .unwrap();

    for summary in recorder.summaries.lock().unwrap().iter() {
        if summary.winner == PointWinner::Opponent {
            // at most +10 per return, at least -20 for the concede
            assert!(summary.reward <= 10.0 * summary.agent_returns as f64 - 20.0 + 1e-9);
        }
    }
}

#[test]
fn test_left_side_agent() {
    let (mut agent, discretizer) = AgentConfig::default()
        .with_side(Side::Left)
        .with_seed(5)
        .build()
        .unwrap();
    let config = TrainingConfig {
        num_points: 4,
        agent_side: Side::Left,
        opponent: ControllerKind::Random,
        seed: Some(5),
        ..TrainingConfig::default()
    };

    let result = TrainingPipeline::new(config)
        .run(&mut agent, &discretizer)
        .unwrap();

    assert_eq!(result.total_points, 4);
}

#[test]
fn test_matches_restart_after_points_to_win() {
    let recorder = RecordingObserver::default();
    let (mut agent, discretizer) = AgentConfig::default().with_seed(2).build().unwrap();
    let config = TrainingConfig {
        num_points: 6,
        points_to_win: 1,
        seed: Some(2),
        ..TrainingConfig::default()
    };

    TrainingPipeline::new(config)
        .with_observer(Box::new(recorder.clone()))
        .run(&mut agent, &discretizer)
        .unwrap();

    for summary in recorder.summaries.lock().unwrap().iter() {
        assert!(summary.agent_score <= 1 && summary.opponent_score <= 1);
    }
}

#[test]
fn test_metrics_and_jsonl_observers() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("points.jsonl");
    let (mut agent, discretizer) = AgentConfig::default().with_seed(4).build().unwrap();
    let config = TrainingConfig {
        num_points: 5,
        seed: Some(4),
        ..TrainingConfig::default()
    };

    TrainingPipeline::new(config)
        .with_observer(Box::new(MetricsObserver::new()))
        .with_observer(Box::new(JsonlObserver::new(&log_path).unwrap()))
        .run(&mut agent, &discretizer)
        .unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 5);
}

#[test]
fn test_result_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.json");
    let (mut agent, discretizer) = AgentConfig::default().with_seed(6).build().unwrap();
    let config = TrainingConfig {
        num_points: 2,
        seed: Some(6),
        ..TrainingConfig::default()
    };

    let result = TrainingPipeline::new(config)
        .run(&mut agent, &discretizer)
        .unwrap();
    result.save(&path).unwrap();
    let loaded = TrainingResult::load(&path).unwrap();

    assert_eq!(loaded.total_points, result.total_points);
    assert_eq!(loaded.ticks, result.ticks);
    assert_eq!(loaded.explored_states, result.explored_states);
}

#[test]
fn test_training_improves_table_coverage_across_runs() {
    let (mut agent, discretizer) = AgentConfig::new(Difficulty::Hard)
        .with_seed(10)
        .build()
        .unwrap();
    let config = TrainingConfig {
        num_points: 3,
        seed: Some(10),
        ..TrainingConfig::default()
    };

    let first = TrainingPipeline::new(config.clone())
        .run(&mut agent, &discretizer)
        .unwrap();
    let second = TrainingPipeline::new(TrainingConfig {
        seed: Some(11),
        ..config
    })
    .run(&mut agent, &discretizer)
    .unwrap();

    assert!(second.explored_states >= first.explored_states);
}
