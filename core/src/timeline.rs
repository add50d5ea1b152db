use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Simulated time, in the same (arbitrary) unit as rates and deadlines.
pub type SimTime = f64;

pub type CustomerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Departure,
    Arrival,
}

impl EventKind {
    pub const DEPARTURE_CODE: u8 = 0;
    pub const ARRIVAL_CODE: u8 = 1;

    pub fn code(self) -> u8 {
        match self {
            EventKind::Departure => Self::DEPARTURE_CODE,
            EventKind::Arrival => Self::ARRIVAL_CODE,
        }
    }
}

impl TryFrom<u8> for EventKind {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            Self::DEPARTURE_CODE => Ok(EventKind::Departure),
            Self::ARRIVAL_CODE => Ok(EventKind::Arrival),
            other => Err(SimError::UnknownEventKind(other)),
        }
    }
}

/// A pending arrival or departure. The subject is the customer the event is about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub subject: CustomerId,
    pub kind: EventKind,
    pub time: SimTime,
}

impl Event {
    pub fn arrival(subject: CustomerId, time: SimTime) -> Self {
        Self {
            subject,
            kind: EventKind::Arrival,
            time,
        }
    }

    pub fn departure(subject: CustomerId, time: SimTime) -> Self {
        Self {
            subject,
            kind: EventKind::Departure,
            time,
        }
    }
}

/// Heap slot: time first, insertion sequence second.
#[derive(Debug)]
struct Scheduled {
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Scheduled {}
impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event
            .time
            .total_cmp(&other.event.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Pending events ordered by simulated time.
///
/// Events sharing a timestamp are all retained and pop in insertion order.
#[derive(Debug, Default)]
pub struct EventTimeline {
    events: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl EventTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Reverse(Scheduled { seq, event }));
    }

    pub fn pop_earliest(&mut self) -> Result<Event, SimError> {
        self.events
            .pop()
            .map(|Reverse(slot)| slot.event)
            .ok_or(SimError::EmptyTimeline)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
