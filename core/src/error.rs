//! Error types for the simulation kernel.

use crate::timeline::{CustomerId, SimTime};
use thiserror::Error;

/// Fatal conditions that abort a run.
///
/// Capacity blocking and deadline expiry are not errors; they are counted
/// in [`crate::analytics::RunStats`].
#[derive(Debug, Error)]
pub enum SimError {
    /// Popped from a timeline with nothing scheduled
    #[error("event timeline is empty")]
    EmptyTimeline,

    /// Event kind code outside the known set
    #[error("unknown event kind code: {0}")]
    UnknownEventKind(u8),

    /// A departure fired for a customer that no server is holding
    #[error("departure of customer {customer} at t={time} matches no busy server")]
    OrphanDeparture { customer: CustomerId, time: SimTime },

    /// Server id outside the pool
    #[error("no server with id {0}")]
    UnknownServer(usize),

    /// Tried to hand a customer to a server that is already serving one
    #[error("server {0} is busy")]
    ServerBusy(usize),

    /// Tried to release a server that holds no customer
    #[error("server {0} is idle")]
    ServerIdle(usize),

    /// The deadline speed sampler never landed inside the admissible range
    #[error("no speed sample in [{lo}, {hi}] after {attempts} draws")]
    DeadlineSampling { lo: f64, hi: f64, attempts: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("histogram error: {0}")]
    Histogram(String),
}

/// Problems with a [`crate::config::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn out_of_range(field: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            reason: reason.into(),
        }
    }
}
