use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceModel {
    /// Exponentially distributed service times at `rate` completions per unit time.
    Exponential { rate: f64 },
    /// Every customer takes exactly `duration`.
    Constant { duration: f64 },
}

impl Default for ServiceModel {
    fn default() -> Self {
        Self::Exponential { rate: 0.3 }
    }
}

/// Deadline = `distance / speed`, with speed drawn from a Gaussian truncated to
/// `[speed_min, speed_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadlineModel {
    pub speed_mean: f64,
    pub speed_std_dev: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub distance: f64,
}

impl Default for DeadlineModel {
    fn default() -> Self {
        Self {
            speed_mean: 24.78,
            speed_std_dev: 7.434,
            speed_min: 10.0,
            speed_max: 50.0,
            distance: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub servers: usize,
    /// `None` means the waiting room is unbounded.
    pub queue_capacity: Option<usize>,
    /// Exactly this many arrival events are generated, the first included.
    pub max_arrivals: u64,
    pub arrival_rate: f64,
    pub service: ServiceModel,
    /// Probability that a handoff from the queue to an idle server is suppressed.
    pub blocking_probability: f64,
    pub deadline: DeadlineModel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            servers: 1,
            queue_capacity: Some(10_000),
            max_arrivals: 100_000,
            arrival_rate: 0.15,
            service: ServiceModel::default(),
            blocking_probability: 0.0,
            deadline: DeadlineModel::default(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, format!("{value} must be finite and > 0")))
    }
}

impl SimConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers == 0 {
            return Err(ConfigError::out_of_range("servers", "need at least one server"));
        }
        positive("arrival_rate", self.arrival_rate)?;
        match self.service {
            ServiceModel::Exponential { rate } => positive("service.rate", rate)?,
            ServiceModel::Constant { duration } => {
                if !duration.is_finite() || duration < 0.0 {
                    return Err(ConfigError::out_of_range(
                        "service.duration",
                        format!("{duration} must be finite and >= 0"),
                    ));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.blocking_probability) {
            return Err(ConfigError::out_of_range(
                "blocking_probability",
                format!("{} is not in [0, 1]", self.blocking_probability),
            ));
        }

        let d = &self.deadline;
        positive("deadline.distance", d.distance)?;
        positive("deadline.speed_min", d.speed_min)?;
        if !d.speed_mean.is_finite() {
            return Err(ConfigError::out_of_range("deadline.speed_mean", "must be finite"));
        }
        if !d.speed_std_dev.is_finite() || d.speed_std_dev < 0.0 {
            return Err(ConfigError::out_of_range(
                "deadline.speed_std_dev",
                "must be finite and >= 0",
            ));
        }
        if !d.speed_max.is_finite() || d.speed_max <= d.speed_min {
            return Err(ConfigError::out_of_range(
                "deadline.speed_max",
                format!("{} must exceed speed_min {}", d.speed_max, d.speed_min),
            ));
        }
        Ok(())
    }
}
