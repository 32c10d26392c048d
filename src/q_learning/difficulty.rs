//! Difficulty levels and the learning parameters they select.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Named difficulty level of the learning paddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Canonical learning parameters for this level.
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                alpha: 0.1,
                gamma: 0.9,
                epsilon: 0.1,
            },
            Difficulty::Medium => DifficultyProfile {
                alpha: 0.2,
                gamma: 0.9,
                epsilon: 0.2,
            },
            Difficulty::Hard => DifficultyProfile {
                alpha: 0.2,
                gamma: 0.95,
                epsilon: 0.4,
            },
        }
    }

    /// Next level in the Easy → Medium → Hard → Easy cycle.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(Error::ParseDifficulty {
                input: s.to_string(),
                expected: "easy, medium, hard".to_string(),
            }),
        }
    }
}

/// Learning rate α, discount factor γ and exploration rate ε.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
}

impl DifficultyProfile {
    /// Build a profile outside the canonical levels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterOutOfRange`] unless 0 < α ≤ 1, 0 ≤ γ ≤ 1 and
    /// 0 ≤ ε ≤ 1.
    pub fn custom(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::ParameterOutOfRange {
                parameter: "alpha",
                value: alpha,
                range: "(0, 1]",
            });
        }
        for (parameter, value) in [("gamma", gamma), ("epsilon", epsilon)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ParameterOutOfRange {
                    parameter,
                    value,
                    range: "[0, 1]",
                });
            }
        }
        Ok(Self {
            alpha,
            gamma,
            epsilon,
        })
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

impl fmt::Display for DifficultyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alpha={}, gamma={}, epsilon={}",
            self.alpha, self.gamma, self.epsilon
        )
    }
}
