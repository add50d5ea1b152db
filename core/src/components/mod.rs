use crate::timeline::{CustomerId, SimTime};
use serde::{Deserialize, Serialize};

pub mod client;
pub mod queue;
pub mod server;

/// A unit moving through the station.
///
/// Owned by exactly one of the [`queue::DeadlineQueue`] or a [`server::Server`]
/// between admission and departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub arrival_time: SimTime,
    pub service_time: SimTime,
    pub initial_deadline: SimTime,
    /// Remaining time to deadline as of the queue's last decay. Zero once expired.
    pub residual_deadline: SimTime,
    pub service_start: SimTime,
    pub service_complete: SimTime,
    pub queueing_delay: SimTime,
    pub system_delay: SimTime,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        arrival_time: SimTime,
        service_time: SimTime,
        deadline: SimTime,
    ) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            initial_deadline: deadline,
            residual_deadline: deadline,
            service_start: 0.0,
            service_complete: 0.0,
            queueing_delay: 0.0,
            system_delay: 0.0,
        }
    }
}
