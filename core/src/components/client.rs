use super::Customer;
use crate::config::{DeadlineModel, ServiceModel, SimConfig};
use crate::error::SimError;
use crate::timeline::Event;
use crate::traits::VariateSource;

/// Give up on the truncated Gaussian after this many rejected draws.
pub const MAX_SPEED_DRAWS: u32 = 10_000;

/// External load source: generates the capped arrival stream and draws each
/// customer's service time and deadline.
#[derive(Debug, Clone)]
pub struct Client {
    pub arrival_rate: f64,
    pub max_arrivals: u64,
    pub service: ServiceModel,
    pub deadline: DeadlineModel,
    generated: u64,
}

impl Client {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            arrival_rate: config.arrival_rate,
            max_arrivals: config.max_arrivals,
            service: config.service,
            deadline: config.deadline,
            generated: 0,
        }
    }

    /// Arrival events created so far, the first included.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    fn exhausted(&self) -> bool {
        self.generated >= self.max_arrivals
    }

    /// The opening arrival, one interarrival gap after time zero.
    pub fn first_arrival(&mut self, variates: &mut dyn VariateSource) -> Option<Event> {
        if self.exhausted() {
            return None;
        }
        self.generated = 1;
        Some(Event::arrival(1, variates.exponential(self.arrival_rate)))
    }

    pub fn next_arrival(
        &mut self,
        last: &Event,
        variates: &mut dyn VariateSource,
    ) -> Option<Event> {
        if self.exhausted() {
            return None;
        }
        self.generated += 1;
        let gap = variates.exponential(self.arrival_rate);
        Some(Event::arrival(last.subject + 1, last.time + gap))
    }

    /// Builds the customer carried by an arrival event.
    pub fn customer_for(
        &self,
        event: &Event,
        variates: &mut dyn VariateSource,
    ) -> Result<Customer, SimError> {
        let deadline = self.draw_deadline(variates)?;
        let service_time = match self.service {
            ServiceModel::Constant { duration } => duration,
            ServiceModel::Exponential { rate } => variates.exponential(rate),
        };
        Ok(Customer::new(event.subject, event.time, service_time, deadline))
    }

    fn draw_deadline(&self, variates: &mut dyn VariateSource) -> Result<f64, SimError> {
        let d = &self.deadline;
        for _ in 0..MAX_SPEED_DRAWS {
            let speed = variates.gaussian(d.speed_mean, d.speed_std_dev);
            if (d.speed_min..=d.speed_max).contains(&speed) {
                return Ok(d.distance / speed);
            }
        }
        Err(SimError::DeadlineSampling {
            lo: d.speed_min,
            hi: d.speed_max,
            attempts: MAX_SPEED_DRAWS,
        })
    }
}
