//! Training pipeline abstractions
//!
//! This module provides:
//! - A point-by-point training loop against a scripted opponent
//! - Observers for progress display, metrics and per-point logs

pub mod observers;
pub mod training;

pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, PointRecord, ProgressObserver};
pub use training::{PointSummary, PointWinner, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
