use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Distribution of samples across an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    /// Evenly spaced samples.
    #[default]
    Uniform,
    /// Samples clustered towards both ends via `(1 - cos(πt)) / 2`.
    Cosine,
}

impl Spacing {
    /// `count` samples from `start` to `end`, both ends included exactly.
    ///
    /// `count == 1` yields `[start]`, `count == 0` yields nothing.
    /// `start > end` produces a descending sequence.
    #[must_use]
    pub fn sample(self, start: f64, end: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let last = count - 1;
                (0..count)
                    .map(|i| {
                        if i == 0 {
                            start
                        } else if i == last {
                            end
                        } else {
                            #[allow(clippy::cast_precision_loss)]
                            let t = i as f64 / last as f64;
                            start + (end - start) * self.remap(t)
                        }
                    })
                    .collect()
            }
        }
    }

    fn remap(self, t: f64) -> f64 {
        match self {
            Self::Uniform => t,
            Self::Cosine => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("uniform"),
            Self::Cosine => f.write_str("cosine"),
        }
    }
}

impl FromStr for Spacing {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "linear" => Ok(Self::Uniform),
            "cosine" | "cos" => Ok(Self::Cosine),
            other => Err(ConfigurationError::UnknownSpacing(other.to_string())),
        }
    }
}

/// Evenly spaced samples from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    Spacing::Uniform.sample(start, end, count)
}

/// Cosine-clustered samples from `start` to `end` inclusive.
#[must_use]
pub fn cosine_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    Spacing::Cosine.sample(start, end, count)
}
