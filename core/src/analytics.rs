use crate::error::SimError;
use crate::timeline::SimTime;
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Histogram resolution: delays are recorded in thousandths of a time unit.
const HISTOGRAM_SCALE: f64 = 1000.0;

/// Running count/sum/sum-of-squares aggregate over a stream of observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsAccumulator {
    count: u64,
    sum: f64,
    sum_of_squares: f64,
    last: f64,
    min: f64,
    max: f64,
}

impl Default for StatisticsAccumulator {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            last: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.last = value;
        self.sum += value;
        self.sum_of_squares += value * value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn last(&self) -> f64 {
        self.last
    }

    /// `+inf` until the first observation.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// `-inf` until the first observation.
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        if self.count > 0 {
            self.sum / self.count as f64
        } else {
            0.0
        }
    }

    pub fn sample_variance(&self) -> f64 {
        if self.count > 1 {
            let n = self.count as f64;
            (self.sum_of_squares - (self.sum * self.sum) / n) / (n - 1.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        // Cancellation can leave a tiny negative variance.
        self.sample_variance().max(0.0).sqrt()
    }
}

/// A delay metric: exact moments plus an HDR histogram for quantiles.
#[derive(Debug, Clone)]
pub struct DelayMetric {
    stats: StatisticsAccumulator,
    histogram: Histogram<u64>,
}

impl DelayMetric {
    pub fn new() -> Result<Self, SimError> {
        let histogram =
            Histogram::<u64>::new(3).map_err(|e| SimError::Histogram(e.to_string()))?;
        Ok(Self {
            stats: StatisticsAccumulator::new(),
            histogram,
        })
    }

    pub fn record(&mut self, delay: SimTime) {
        self.stats.add(delay);
        self.histogram
            .saturating_record((delay.max(0.0) * HISTOGRAM_SCALE).round() as u64);
    }

    pub fn stats(&self) -> &StatisticsAccumulator {
        &self.stats
    }

    pub fn quantile(&self, q: f64) -> f64 {
        if self.histogram.len() == 0 {
            return 0.0;
        }
        self.histogram.value_at_quantile(q) as f64 / HISTOGRAM_SCALE
    }

    pub fn summary(&self) -> DelaySummary {
        let s = &self.stats;
        let empty = s.count() == 0;
        DelaySummary {
            count: s.count(),
            mean: s.mean(),
            std_dev: s.std_dev(),
            min: if empty { 0.0 } else { s.min() },
            max: if empty { 0.0 } else { s.max() },
            p50: self.quantile(0.50),
            p90: self.quantile(0.90),
            p99: self.quantile(0.99),
        }
    }
}

/// Accumulation state of a single run. Owned by the engine and lent to the
/// queue and server pool.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Service started while the residual deadline was still positive.
    pub matched_completions: u64,
    /// Residual deadline crossed zero while waiting. Counted once per customer.
    pub expired_while_waiting: u64,
    /// Turned away because the waiting room was full.
    pub blocked_on_admission: u64,
    pub queueing_delay: DelayMetric,
    pub system_delay: DelayMetric,
}

impl RunStats {
    pub fn new() -> Result<Self, SimError> {
        Ok(Self {
            matched_completions: 0,
            expired_while_waiting: 0,
            blocked_on_admission: 0,
            queueing_delay: DelayMetric::new()?,
            system_delay: DelayMetric::new()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaySummary {
    pub count: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

/// Final figures of a drained run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: Option<u64>,
    pub wall_time: Duration,
    pub final_clock: SimTime,
    pub arrival_cap: u64,
    pub arrivals_generated: u64,
    pub arrivals_dispatched: u64,
    pub departures_dispatched: u64,
    pub matched_completions: u64,
    pub expired_while_waiting: u64,
    pub blocked_on_admission: u64,
    pub matched_probability: f64,
    pub expired_probability: f64,
    pub blocking_probability: f64,
    pub queueing_delay: DelaySummary,
    pub system_delay: DelaySummary,
}

impl RunReport {
    /// Counts are normalized by the configured arrival cap.
    pub fn ratio(count: u64, cap: u64) -> f64 {
        if cap == 0 {
            0.0
        } else {
            count as f64 / cap as f64
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution time: {:.3}s", self.wall_time.as_secs_f64())?;
        writeln!(f, "Simulated clock: {:.3}", self.final_clock)?;
        writeln!(
            f,
            "Arrivals: {} generated, {} departures",
            self.arrivals_generated, self.departures_dispatched
        )?;
        writeln!(
            f,
            "Probability of matched service completion: {:.6}",
            self.matched_probability
        )?;
        writeln!(f, "Probability of deadline mismatch: {:.6}", self.expired_probability)?;
        writeln!(f, "Probability of blocking: {:.6}", self.blocking_probability)?;
        writeln!(
            f,
            "System response time: mean {:.4}, p50 {:.3}, p99 {:.3}",
            self.system_delay.mean, self.system_delay.p50, self.system_delay.p99
        )?;
        write!(
            f,
            "Queueing response time: mean {:.4}, p50 {:.3}, p99 {:.3}",
            self.queueing_delay.mean, self.queueing_delay.p50, self.queueing_delay.p99
        )
    }
}
