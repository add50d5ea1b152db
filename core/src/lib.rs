pub mod analytics;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod timeline;
pub mod traits;
pub mod variates;

pub use analytics::{DelayMetric, DelaySummary, RunReport, RunStats, StatisticsAccumulator};
pub use components::client::Client;
pub use components::queue::DeadlineQueue;
pub use components::server::{Server, ServerId, ServerPool, ServerStatus};
pub use components::Customer;
pub use config::{DeadlineModel, ServiceModel, SimConfig};
pub use engine::{RunState, Simulation};
pub use error::{ConfigError, SimError};
pub use timeline::{CustomerId, Event, EventKind, EventTimeline, SimTime};
pub use traits::VariateSource;
pub use variates::SeededVariates;
