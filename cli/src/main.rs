//! EDF station simulator CLI
//!
//! Runs one simulation to drain and prints the estimated probabilities and delays.

use clap::Parser;
use edfsim_core::{ServiceModel, SimConfig, SimError, Simulation};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Simulate a single station serving customers earliest-deadline-first
#[derive(Parser, Debug)]
#[command(name = "edfsim")]
#[command(about = "Discrete-event simulation of an EDF queueing station", long_about = None)]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the variate stream (0 = derive from the clock)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of servers
    #[arg(long)]
    servers: Option<usize>,

    /// Waiting room capacity
    #[arg(long, conflicts_with = "unbounded")]
    capacity: Option<usize>,

    /// Never block arrivals on capacity
    #[arg(long)]
    unbounded: bool,

    /// Number of arrival events to generate
    #[arg(short = 'n', long)]
    arrivals: Option<u64>,

    /// Arrival rate (lambda)
    #[arg(long)]
    arrival_rate: Option<f64>,

    /// Exponential service rate (mu)
    #[arg(long, conflicts_with = "constant_service")]
    service_rate: Option<f64>,

    /// Fixed service duration instead of exponential service
    #[arg(long)]
    constant_service: Option<f64>,

    /// Probability that a handoff to an idle server is suppressed
    #[arg(short, long)]
    blocking_probability: Option<f64>,

    /// Mean of the Gaussian speed behind each deadline
    #[arg(long)]
    speed_mean: Option<f64>,

    /// Standard deviation of the deadline speed
    #[arg(long)]
    speed_std_dev: Option<f64>,

    /// Lower truncation bound for the deadline speed
    #[arg(long)]
    speed_min: Option<f64>,

    /// Upper truncation bound for the deadline speed
    #[arg(long)]
    speed_max: Option<f64>,

    /// Distance divided by speed to give the deadline
    #[arg(long)]
    distance: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> Result<SimConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_json_file(path)?,
            None => SimConfig::default(),
        };
        if let Some(servers) = self.servers {
            config.servers = servers;
        }
        if self.unbounded {
            config.queue_capacity = None;
        } else if let Some(capacity) = self.capacity {
            config.queue_capacity = Some(capacity);
        }
        if let Some(arrivals) = self.arrivals {
            config.max_arrivals = arrivals;
        }
        if let Some(rate) = self.arrival_rate {
            config.arrival_rate = rate;
        }
        if let Some(rate) = self.service_rate {
            config.service = ServiceModel::Exponential { rate };
        }
        if let Some(duration) = self.constant_service {
            config.service = ServiceModel::Constant { duration };
        }
        if let Some(p) = self.blocking_probability {
            config.blocking_probability = p;
        }
        let deadline = &mut config.deadline;
        if let Some(mean) = self.speed_mean {
            deadline.speed_mean = mean;
        }
        if let Some(std_dev) = self.speed_std_dev {
            deadline.speed_std_dev = std_dev;
        }
        if let Some(min) = self.speed_min {
            deadline.speed_min = min;
        }
        if let Some(max) = self.speed_max {
            deadline.speed_max = max;
        }
        if let Some(distance) = self.distance {
            deadline.distance = distance;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };
    let json = args.json;

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    info!(
        seed,
        servers = config.servers,
        arrivals = config.max_arrivals,
        "starting simulation"
    );

    let report = match Simulation::seeded(config, seed).and_then(|mut sim| sim.run()) {
        Ok(report) => report,
        Err(e) => {
            error!("simulation aborted: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                error!("failed to encode report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{report}");
    }
}
