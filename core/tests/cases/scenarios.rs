use crate::common::{station, TestHarness};
use edfsim_core::*;

#[test]
fn test_single_server_unbounded_queue() {
    let mut h = TestHarness::new_with_seed(station(1000), 42);
    let report = h.run_checked();

    assert_eq!(h.sim.state, RunState::Drained);
    assert_eq!(report.blocked_on_admission, 0);
    assert_eq!(
        report.matched_completions + report.expired_while_waiting,
        1000
    );
    assert!(report.system_delay.mean > report.queueing_delay.mean);
    assert_eq!(report.system_delay.count, 1000);
}

#[test]
fn test_zero_capacity_blocks_every_arrival() {
    let mut config = station(250);
    config.queue_capacity = Some(0);
    let mut h = TestHarness::new_with_seed(config, 3);
    let report = h.run_checked();

    assert_eq!(report.blocked_on_admission, 250);
    assert_eq!(report.matched_completions, 0);
    assert_eq!(report.expired_while_waiting, 0);
    assert_eq!(report.departures_dispatched, 0);
    assert_eq!(report.blocking_probability, 1.0);
}

#[test]
fn test_certain_handoff_blocking_fills_the_queue() {
    let mut config = station(200);
    config.queue_capacity = Some(50);
    config.blocking_probability = 1.0;
    let mut h = TestHarness::new_with_seed(config, 11);
    let report = h.run_checked();

    assert_eq!(report.departures_dispatched, 0);
    assert_eq!(report.matched_completions, 0);
    assert_eq!(h.sim.queue.len(), 50);
    assert_eq!(report.blocked_on_admission, 150);
    assert_eq!(h.sim.servers.busy_count(), 0);
    assert!(report.expired_while_waiting <= 50);
}

#[test]
fn test_equal_deadlines_are_served_in_arrival_order() {
    let mut config = station(3);
    config.service = ServiceModel::Constant { duration: 10.0 };
    config.deadline.distance = 100.0;
    // Customer 1 occupies the server; 2 and 3 arrive together with equal deadlines.
    let mut h = TestHarness::scripted(config, &[1.0, 1.0, 0.0], &[20.0, 25.0, 25.0]);

    for _ in 0..3 {
        assert!(h.sim.step().unwrap());
    }
    assert_eq!(h.sim.queue.buckets(), vec![(4.0, 2)]);

    let mut starts = vec![1];
    while h.sim.step().unwrap() {
        if let Some(c) = h.sim.servers.get(0).and_then(|s| s.customer()) {
            if starts.last() != Some(&c.id) {
                starts.push(c.id);
            }
        }
    }
    assert_eq!(starts, vec![1, 2, 3]);
    assert_eq!(h.sim.stats.matched_completions, 3);
}
