use crate::analytics::{RunReport, RunStats};
use crate::components::client::Client;
use crate::components::queue::DeadlineQueue;
use crate::components::server::{ServerId, ServerPool};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::timeline::{Event, EventKind, EventTimeline, SimTime};
use crate::traits::VariateSource;
use crate::variates::SeededVariates;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Drained,
}

/// One run of the station. Owns every piece of run state.
pub struct Simulation {
    pub config: SimConfig,
    pub time: SimTime,
    pub state: RunState,
    pub timeline: EventTimeline,
    pub queue: DeadlineQueue,
    pub servers: ServerPool,
    pub stats: RunStats,
    pub client: Client,
    pub arrivals_dispatched: u64,
    pub departures_dispatched: u64,
    variates: Box<dyn VariateSource>,
    seed: Option<u64>,
}

impl Simulation {
    /// Validates the config and schedules the first arrival.
    pub fn new(config: SimConfig, variates: Box<dyn VariateSource>) -> Result<Self, SimError> {
        config.validate()?;
        let mut sim = Self {
            time: 0.0,
            state: RunState::Running,
            timeline: EventTimeline::new(),
            queue: DeadlineQueue::new(config.queue_capacity),
            servers: ServerPool::new(config.servers),
            stats: RunStats::new()?,
            client: Client::new(&config),
            arrivals_dispatched: 0,
            departures_dispatched: 0,
            variates,
            seed: None,
            config,
        };
        if let Some(first) = sim.client.first_arrival(sim.variates.as_mut()) {
            sim.timeline.insert(first);
        }
        debug!(config = ?sim.config, "simulation initialised");
        Ok(sim)
    }

    pub fn seeded(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        let mut sim = Self::new(config, Box::new(SeededVariates::new(seed)))?;
        sim.seed = Some(seed);
        Ok(sim)
    }

    /// Customers admitted and not yet departed.
    pub fn in_system(&self) -> usize {
        self.queue.len() + self.servers.busy_count()
    }

    /// Dispatches the earliest pending event. Returns `false` once drained.
    pub fn step(&mut self) -> Result<bool, SimError> {
        if self.state == RunState::Drained {
            return Ok(false);
        }
        if self.timeline.is_empty() {
            self.state = RunState::Drained;
            info!(
                time = self.time,
                matched = self.stats.matched_completions,
                expired = self.stats.expired_while_waiting,
                blocked = self.stats.blocked_on_admission,
                "event timeline drained"
            );
            return Ok(false);
        }

        let event = self.timeline.pop_earliest()?;
        self.time = event.time;
        trace!(subject = event.subject, kind = ?event.kind, time = event.time, "dispatch");

        match event.kind {
            EventKind::Arrival => {
                self.arrivals_dispatched += 1;
                self.on_arrival(&event)?;
                if let Some(next) = self.client.next_arrival(&event, self.variates.as_mut()) {
                    self.timeline.insert(next);
                }
            }
            EventKind::Departure => {
                self.departures_dispatched += 1;
                self.on_departure(&event)?;
            }
        }
        Ok(true)
    }

    /// Runs until the timeline drains.
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        let started = Instant::now();
        while self.step()? {}
        Ok(self.report(started.elapsed()))
    }

    pub fn report(&self, wall_time: Duration) -> RunReport {
        let cap = self.config.max_arrivals;
        RunReport {
            seed: self.seed,
            wall_time,
            final_clock: self.time,
            arrival_cap: cap,
            arrivals_generated: self.client.generated(),
            arrivals_dispatched: self.arrivals_dispatched,
            departures_dispatched: self.departures_dispatched,
            matched_completions: self.stats.matched_completions,
            expired_while_waiting: self.stats.expired_while_waiting,
            blocked_on_admission: self.stats.blocked_on_admission,
            matched_probability: RunReport::ratio(self.stats.matched_completions, cap),
            expired_probability: RunReport::ratio(self.stats.expired_while_waiting, cap),
            blocking_probability: RunReport::ratio(self.stats.blocked_on_admission, cap),
            queueing_delay: self.stats.queueing_delay.summary(),
            system_delay: self.stats.system_delay.summary(),
        }
    }

    fn on_arrival(&mut self, event: &Event) -> Result<(), SimError> {
        let customer = self.client.customer_for(event, self.variates.as_mut())?;
        self.queue.enqueue(customer, event.time, &mut self.stats);

        if self.handoff_allowed() {
            while let Some(server) = self.servers.find_idle() {
                if !self.start_service(server, event.time)? {
                    break;
                }
            }
        }
        Ok(())
    }

    fn on_departure(&mut self, event: &Event) -> Result<(), SimError> {
        let server = self
            .servers
            .find_serving(event.subject)
            .ok_or(SimError::OrphanDeparture {
                customer: event.subject,
                time: event.time,
            })?;
        self.servers.release(server, event.time, &mut self.stats)?;

        if self.handoff_allowed() {
            self.start_service(server, event.time)?;
        }
        Ok(())
    }

    /// Handoff gate: a fresh uniform draw at or above the blocking probability.
    fn handoff_allowed(&mut self) -> bool {
        self.variates.uniform() >= self.config.blocking_probability
    }

    /// Moves the most urgent waiting customer onto `server`. `false` if nobody waits.
    fn start_service(&mut self, server: ServerId, now: SimTime) -> Result<bool, SimError> {
        let Some(customer) = self.queue.dequeue_earliest_deadline(now, &mut self.stats) else {
            return Ok(false);
        };
        let id = customer.id;
        let complete = self.servers.assign(server, customer, now)?;
        self.timeline.insert(Event::departure(id, complete));
        trace!(customer = id, server, complete, "service started");
        Ok(true)
    }
}
