//! Observer implementations for the training pipeline
//!
//! Observers collect data during training without coupling the match loop
//! to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::{PointSummary, PointWinner};
use crate::{Result, ports::Observer};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    agent_points: usize,
    opponent_points: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            agent_points: 0,
            opponent_points: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} - {}", self.agent_points, self.opponent_points)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_points: usize) -> Result<()> {
        let pb = ProgressBar::new(total_points as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} points (agent {msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_point_end(&mut self, point_num: usize, summary: &PointSummary) -> Result<()> {
        match summary.winner {
            PointWinner::Agent => self.agent_points += 1,
            PointWinner::Opponent => self.opponent_points += 1,
            PointWinner::Unfinished => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(point_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    points: usize,
    agent_points: usize,
    concedes: usize,
    unfinished: usize,
    returns: usize,
    total_reward: f64,
    rally_lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of decided points the agent won
    pub fn win_rate(&self) -> f64 {
        let decided = self.agent_points + self.concedes;
        if decided == 0 {
            0.0
        } else {
            self.agent_points as f64 / decided as f64
        }
    }

    /// Average number of agent returns per point
    pub fn returns_per_point(&self) -> f64 {
        if self.points == 0 {
            0.0
        } else {
            self.returns as f64 / self.points as f64
        }
    }

    /// Average ticks per point
    pub fn avg_rally_length(&self) -> f64 {
        if self.rally_lengths.is_empty() {
            0.0
        } else {
            self.rally_lengths.iter().sum::<usize>() as f64 / self.rally_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            points: self.points,
            agent_points: self.agent_points,
            concedes: self.concedes,
            unfinished: self.unfinished,
            returns: self.returns,
            total_reward: self.total_reward,
            win_rate: self.win_rate(),
            returns_per_point: self.returns_per_point(),
            avg_rally_length: self.avg_rally_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub points: usize,
    pub agent_points: usize,
    pub concedes: usize,
    pub unfinished: usize,
    pub returns: usize,
    pub total_reward: f64,
    pub win_rate: f64,
    pub returns_per_point: f64,
    pub avg_rally_length: f64,
}

impl Observer for MetricsObserver {
    fn on_point_end(&mut self, _point_num: usize, summary: &PointSummary) -> Result<()> {
        self.points += 1;
        match summary.winner {
            PointWinner::Agent => self.agent_points += 1,
            PointWinner::Opponent => self.concedes += 1,
            PointWinner::Unfinished => self.unfinished += 1,
        }
        self.returns += summary.agent_returns;
        self.total_reward += summary.reward;
        self.rally_lengths.push(summary.ticks);
        Ok(())
    }
}

/// One JSON line per point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointRecord {
    pub point_num: usize,
    #[serde(flatten)]
    pub summary: PointSummary,
}

/// JSONL observer - Writes every point summary to a JSON Lines file
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_point_end(&mut self, point_num: usize, summary: &PointSummary) -> Result<()> {
        let record = PointRecord {
            point_num,
            summary: *summary,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
