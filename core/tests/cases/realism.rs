use crate::common::{station, TestHarness};

// M/M/1 at rho = 0.5: W = 1 / (mu - lambda), Wq = rho * W.
#[test]
fn test_mm1_delays_match_theory() {
    let mut h = TestHarness::new_with_seed(station(10_000), 42);
    let report = h.run_checked();

    let w = 1.0 / (0.3 - 0.15);
    let wq = 0.5 * w;
    assert!(
        (report.system_delay.mean - w).abs() < 0.2 * w,
        "system delay {} too far from {w}",
        report.system_delay.mean
    );
    assert!(
        (report.queueing_delay.mean - wq).abs() < 0.3 * wq,
        "queueing delay {} too far from {wq}",
        report.queueing_delay.mean
    );
    assert!(report.system_delay.p99 > report.system_delay.p50);
}

#[test]
fn test_light_load_rarely_misses_deadlines() {
    // Deadlines are 20..100 units; at rho = 0.5 queueing delay is a few units.
    let mut h = TestHarness::new_with_seed(station(5000), 9);
    let report = h.run_checked();
    assert!(report.matched_probability > 0.95, "{}", report.matched_probability);
}
