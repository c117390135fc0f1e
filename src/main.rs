use std::net::IpAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use flightrelay::config::{RelayConfig, parse_seconds};
use flightrelay::simulation::{SimulatedHost, SimulationConfig};
use flightrelay::{logging, relay};

#[derive(Parser, Debug)]
#[command(name = "flightrelay")]
#[command(about = "Relay flight simulator telemetry to LAN map and gauge clients", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging entirely
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Address to bind the control socket on
    #[arg(long)]
    bind: Option<IpAddr>,

    /// UDP port for control requests
    #[arg(long)]
    control_port: Option<u16>,

    /// UDP port of the map feed on client machines
    #[arg(long)]
    map_port: Option<u16>,

    /// UDP port of the gauge and lite-map feeds on client machines
    #[arg(long)]
    gauge_port: Option<u16>,

    /// Address advertised in discovery replies instead of the detected one
    #[arg(long)]
    ip_override: Option<String>,

    /// Seed for the simulated host
    #[arg(long)]
    seed: Option<u64>,

    /// Flight plan the simulated host loads once the relay is connected
    #[arg(long)]
    flight_plan: Option<PathBuf>,

    /// Stop after this many seconds instead of running until killed
    #[arg(long, value_parser = parse_seconds)]
    duration: Option<Duration>,
}

impl Args {
    fn relay_config(&self) -> anyhow::Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RelayConfig::default(),
        };

        let network = &mut config.network;
        if let Some(bind) = self.bind {
            network.bind_address = bind;
        }
        if let Some(port) = self.control_port {
            network.control_port = port;
        }
        if let Some(port) = self.map_port {
            network.map_port = port;
        }
        if let Some(port) = self.gauge_port {
            network.gauge_port = port;
        }
        if let Some(ip) = &self.ip_override {
            network.ip_override = Some(ip.clone());
        }
        if self.quiet {
            config.logging.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.relay_config()?;

    logging::init(args.verbose, config.logging.enabled).context("installing logger")?;

    let mut sim_config = SimulationConfig::default();
    if let Some(seed) = args.seed {
        sim_config = sim_config.with_seed(seed);
    }
    let host = SimulatedHost::new(sim_config);
    let host_handle = host.handle();

    let relay = relay::start(config, Box::new(host)).context("starting relay")?;
    log::info!("Relay listening on {}", relay.control_addr());

    if let Some(path) = &args.flight_plan {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !host_handle.is_attached() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(100));
        }
        if host_handle.load_flight_plan(path) {
            log::info!("Simulated host loaded {}", path.display());
        } else {
            log::warn!("Simulated host never connected; {} not loaded", path.display());
        }
    }

    if let Some(duration) = args.duration {
        std::thread::sleep(duration);
        relay.shutdown();
    }
    relay.join();

    Ok(())
}
