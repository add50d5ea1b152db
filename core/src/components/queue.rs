use super::Customer;
use crate::analytics::RunStats;
use crate::timeline::SimTime;
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Absolute instant at which a bucket's residual deadline reaches zero.
///
/// Decay subtracts the same elapsed time from every live key, so ordering by
/// expiry instant is ordering by residual deadline.
#[derive(Debug, Clone, Copy)]
struct ExpiryAt(SimTime);

impl PartialEq for ExpiryAt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ExpiryAt {}
impl PartialOrd for ExpiryAt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ExpiryAt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Earliest-deadline-first waiting room.
///
/// Live buckets sit in a B-tree keyed by expiry instant. When a decay pass finds
/// a bucket whose residual has reached zero, the bucket is counted as expired once
/// and moved, in order, to the back of the zero-key bucket. Expired customers are
/// never evicted; key 0 is the most urgent key and is always served first.
#[derive(Debug)]
pub struct DeadlineQueue {
    live: BTreeMap<ExpiryAt, VecDeque<Customer>>,
    expired: VecDeque<Customer>,
    capacity: Option<usize>,
    len: usize,
    last_decay: SimTime,
}

impl DeadlineQueue {
    /// `None` capacity means unbounded.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            live: BTreeMap::new(),
            expired: VecDeque::new(),
            capacity,
            len: 0,
            last_decay: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.len >= cap)
    }

    pub fn last_decay(&self) -> SimTime {
        self.last_decay
    }

    /// Decays every queued deadline up to `now`, then admits `customer` unless the
    /// room is full. A blocked customer is dropped and counted.
    pub fn enqueue(
        &mut self,
        mut customer: Customer,
        now: SimTime,
        stats: &mut RunStats,
    ) -> bool {
        self.decay(now, stats);

        if self.is_full() {
            stats.blocked_on_admission += 1;
            debug!(customer = customer.id, time = now, "waiting room full, customer blocked");
            return false;
        }

        if customer.residual_deadline > 0.0 {
            let key = ExpiryAt(self.last_decay + customer.residual_deadline);
            self.live.entry(key).or_default().push_back(customer);
        } else {
            customer.residual_deadline = 0.0;
            stats.expired_while_waiting += 1;
            self.expired.push_back(customer);
        }
        self.len += 1;
        true
    }

    /// Pops the customer with the smallest residual deadline, FIFO among equal
    /// keys. Does not decay; keys are as of the last enqueue.
    pub fn dequeue_earliest_deadline(
        &mut self,
        now: SimTime,
        stats: &mut RunStats,
    ) -> Option<Customer> {
        let (mut customer, matched) = match self.expired.pop_front() {
            Some(customer) => (customer, false),
            None => {
                let mut entry = self.live.first_entry()?;
                let key = *entry.key();
                let customer = entry.get_mut().pop_front();
                if entry.get().is_empty() {
                    entry.remove();
                }
                let mut customer = customer?;
                customer.residual_deadline = key.0 - self.last_decay;
                (customer, true)
            }
        };

        self.len -= 1;
        customer.queueing_delay = now - customer.arrival_time;
        stats.queueing_delay.record(customer.queueing_delay);
        if matched {
            stats.matched_completions += 1;
        }
        Some(customer)
    }

    /// `(residual key, bucket size)` pairs in service order, as of the last decay.
    pub fn buckets(&self) -> Vec<(SimTime, usize)> {
        let expired = (!self.expired.is_empty()).then(|| (0.0, self.expired.len()));
        expired
            .into_iter()
            .chain(
                self.live
                    .iter()
                    .map(|(key, bucket)| (key.0 - self.last_decay, bucket.len())),
            )
            .collect()
    }

    fn decay(&mut self, now: SimTime, stats: &mut RunStats) {
        let now = now.max(self.last_decay);
        while let Some(entry) = self.live.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let bucket = entry.remove();
            stats.expired_while_waiting += bucket.len() as u64;
            debug!(count = bucket.len(), time = now, "deadline bucket expired while waiting");
            self.expired.extend(bucket.into_iter().map(|mut customer| {
                customer.residual_deadline = 0.0;
                customer
            }));
        }
        self.last_decay = now;
    }
}
