use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use flightrelay::config::parse_seconds;
use flightrelay::constants::{DEFAULT_GAUGE_PORT, DEFAULT_MAP_PORT};
use flightrelay::output::{OutputFormat, ReceivedDatagram, format_received};
use flightrelay::protocol::{ClientFeed, ControlCommand};

#[derive(Parser, Debug)]
#[command(name = "relay_probe")]
#[command(about = "Send a control request to a flight relay and print what comes back", long_about = None)]
struct Args {
    /// Control address of the relay
    #[arg(short = 'r', long, default_value = "127.0.0.1:8004")]
    relay: SocketAddr,

    /// Control command code (0-7)
    #[arg(short = 'c', long)]
    command: Option<u32>,

    /// Payload sent after the command code, e.g. this machine's address
    #[arg(short = 'p', long, default_value = "")]
    payload: String,

    /// Receive on a feed port instead of an ephemeral one: map, gauge, lite-map
    #[arg(short = 'l', long, value_enum)]
    listen: Option<ClientFeed>,

    /// Map feed port used with --listen map
    #[arg(long, default_value_t = DEFAULT_MAP_PORT)]
    map_port: u16,

    /// Gauge feed port used with --listen gauge or lite-map
    #[arg(long, default_value_t = DEFAULT_GAUGE_PORT)]
    gauge_port: u16,

    /// Stop after this many datagrams
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Stop after this many seconds without traffic
    #[arg(short = 't', long, default_value = "3", value_parser = parse_seconds)]
    timeout: Duration,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn listen_port(&self) -> u16 {
        match self.listen {
            None => 0,
            Some(ClientFeed::Map) => self.map_port,
            Some(ClientFeed::Gauge | ClientFeed::LiteMap) => self.gauge_port,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    flightrelay::logging::init(args.verbose, true).context("installing logger")?;

    let port = args.listen_port();
    let socket =
        UdpSocket::bind(("0.0.0.0", port)).with_context(|| format!("binding port {}", port))?;
    socket.set_read_timeout(Some(Duration::from_millis(100)))?;
    log::info!("Probe listening on {}", socket.local_addr()?);

    if let Some(code) = args.command {
        let datagram = format!("{}:{}", code, args.payload);
        if let Err(e) = ControlCommand::parse(&datagram) {
            log::warn!("Sending anyway: {}", e);
        }
        socket
            .send_to(datagram.as_bytes(), args.relay)
            .with_context(|| format!("sending {:?} to {}", datagram, args.relay))?;
        log::debug!("Sent {:?}", datagram);
    }

    let idle_limit = args.timeout;
    let mut last_traffic = Instant::now();
    let mut received = 0;
    let mut buf = [0u8; 64 * 1024];

    while args.count.is_none_or(|n| received < n) && last_traffic.elapsed() < idle_limit {
        match socket.recv_from(&mut buf) {
            Ok((len, source)) => {
                let message = String::from_utf8_lossy(&buf[..len]).into_owned();
                let datagram = ReceivedDatagram::new(source, message);
                println!("{}", format_received(args.format, &datagram));
                received += 1;
                last_traffic = Instant::now();
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => return Err(e).context("receiving"),
        }
    }

    if received == 0 {
        log::warn!("Nothing received from {}", args.relay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_flag() {
        let args = Args::try_parse_from(["relay_probe"]).unwrap();
        assert_eq!(args.timeout, Duration::from_secs(3));

        assert!(Args::try_parse_from(["relay_probe", "--timeout", "inf"]).is_err());
        assert!(Args::try_parse_from(["relay_probe", "-t", "-2"]).is_err());
    }

    #[test]
    fn test_listen_port_follows_feed() {
        let args = Args::try_parse_from(["relay_probe", "--listen", "lite-map"]).unwrap();
        assert_eq!(args.listen_port(), DEFAULT_GAUGE_PORT);

        let args = Args::try_parse_from(["relay_probe", "-l", "map", "--map-port", "9005"]).unwrap();
        assert_eq!(args.listen_port(), 9005);
    }
}
