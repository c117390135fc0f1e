//! Configuration for the flight telemetry relay.
//!
//! Every value has a default matching what deployed clients expect, so a
//! config file only needs to name what differs:
//!
//! ```toml
//! [network]
//! ip_override = "192.168.1.20"
//!
//! [supervisor]
//! host_process = "fsx"
//! ```
//!
//! Configuration is read once at startup and never changes while the relay
//! runs.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::constants::{
    DEFAULT_CONTROL_PORT, DEFAULT_FACILITY_CAPACITY, DEFAULT_GAUGE_PORT, DEFAULT_MAP_PORT,
    MAX_FACILITY_CAPACITY,
};
use crate::error::{RelayError, Result};

/// Polling interval in milliseconds
///
/// Accepts a bare number of milliseconds or a value with an `ms` or `s`
/// suffix, both on the command line and in TOML. Zero is rejected.
///
/// # Example
/// ```
/// use flightrelay::config::Interval;
///
/// let interval: Interval = "5s".parse().unwrap();
/// assert_eq!(interval.as_millis(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval(u64);

impl Interval {
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let ms = if let Some(num) = s.strip_suffix("ms") {
            num.trim()
                .parse::<u64>()
                .map_err(|_| format!("invalid interval: {}", s))?
        } else if let Some(num) = s.strip_suffix('s') {
            let secs: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid interval: {}", s))?;
            if secs < 0.0 {
                return Err("interval must be positive".to_string());
            }
            (secs * 1000.0).round() as u64
        } else {
            s.parse::<u64>()
                .map_err(|_| format!("invalid interval: {}", s))?
        };

        if ms == 0 {
            return Err("interval must be positive".to_string());
        }
        Ok(Self(ms))
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(u64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => ms.to_string().parse(),
            Raw::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Parse a non-negative, finite number of seconds for command-line flags
pub fn parse_seconds(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{}: {}", s, e))
}

/// Complete relay configuration
///
/// # Example
/// ```
/// use flightrelay::config::RelayConfig;
///
/// let mut config = RelayConfig::default();
/// config.network.control_port = 9004;
/// assert_eq!(config.network.map_port, 8005);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Sockets and advertised address
    pub network: NetworkConfig,
    /// Provider connection supervision
    pub supervisor: SupervisorConfig,
    /// Telemetry push cadence
    pub poller: PollerConfig,
    /// Facility cache sizing
    pub facilities: FacilityConfig,
    /// Log sink switch
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Local address the control socket binds to
    pub bind_address: IpAddr,
    /// Control request/response port
    pub control_port: u16,
    /// Primary map feed port on the client side
    pub map_port: u16,
    /// Gauge feed port on the client side; lite-map clients listen here too
    pub gauge_port: u16,
    /// Address advertised in discovery replies instead of the detected one
    pub ip_override: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Process name prefix identifying the simulator host
    pub host_process: String,
    /// Tick interval while disconnected (host liveness probing)
    pub slow_interval: Interval,
    /// Tick interval while connected (sample requests)
    pub fast_interval: Interval,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Push cadence for both telemetry feeds
    pub interval: Interval,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// Upper bound on each of the airport, VOR and NDB registries
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
}

impl RelayConfig {
    /// Load a configuration file, falling back to defaults for absent keys
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| RelayError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| RelayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.facilities.capacity < 2 {
            return Err(RelayError::Config(
                "facility capacity must be at least 2".to_string(),
            ));
        }
        if self.facilities.capacity > MAX_FACILITY_CAPACITY {
            return Err(RelayError::Config(format!(
                "facility capacity must be at most {}",
                MAX_FACILITY_CAPACITY
            )));
        }
        let intervals = [
            ("supervisor.slow_interval", self.supervisor.slow_interval),
            ("supervisor.fast_interval", self.supervisor.fast_interval),
            ("poller.interval", self.poller.interval),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, i)| i.as_millis() == 0) {
            return Err(RelayError::Config(format!("{} must be positive", name)));
        }
        if self.network.map_port == 0 || self.network.gauge_port == 0 {
            return Err(RelayError::Config("push ports must be non-zero".to_string()));
        }
        if let Some(ip) = self.network.advertised_override()
            && ip.parse::<IpAddr>().is_err()
        {
            return Err(RelayError::Config(format!("invalid ip_override: {}", ip)));
        }
        Ok(())
    }
}

impl NetworkConfig {
    pub fn control_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.control_port)
    }

    /// Override trimmed, with empty strings treated as unset
    pub fn advertised_override(&self) -> Option<&str> {
        self.ip_override
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            control_port: DEFAULT_CONTROL_PORT,
            map_port: DEFAULT_MAP_PORT,
            gauge_port: DEFAULT_GAUGE_PORT,
            ip_override: None,
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            host_process: "fsx".to_string(),
            slow_interval: Interval::from_millis(5000),
            fast_interval: Interval::from_millis(100),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Interval::from_millis(100),
        }
    }
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_FACILITY_CAPACITY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_parsing() {
        assert_eq!("100".parse::<Interval>().unwrap().as_millis(), 100);
        assert_eq!("250ms".parse::<Interval>().unwrap().as_millis(), 250);
        assert_eq!("5s".parse::<Interval>().unwrap().as_millis(), 5000);
        assert_eq!("0.5s".parse::<Interval>().unwrap().as_millis(), 500);
    }

    #[test]
    fn test_interval_invalid() {
        assert!("abc".parse::<Interval>().is_err());
        assert!("0".parse::<Interval>().is_err());
        assert!("-1s".parse::<Interval>().is_err());
    }

    #[test]
    fn test_defaults_match_deployed_clients() {
        let config = RelayConfig::default();
        assert_eq!(config.network.control_port, 8004);
        assert_eq!(config.network.map_port, 8005);
        assert_eq!(config.network.gauge_port, 8006);
        assert_eq!(config.supervisor.slow_interval.as_millis(), 5000);
        assert_eq!(config.supervisor.fast_interval.as_millis(), 100);
        assert_eq!(config.poller.interval.as_millis(), 100);
        assert_eq!(config.facilities.capacity, 500);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RelayConfig::from_toml_str(
            r#"
            [network]
            ip_override = "10.0.0.7"

            [supervisor]
            fast_interval = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.network.advertised_override(), Some("10.0.0.7"));
        assert_eq!(config.network.control_port, 8004);
        assert_eq!(config.supervisor.fast_interval.as_millis(), 50);
        assert_eq!(config.supervisor.slow_interval.as_millis(), 5000);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = RelayConfig::from_toml_str(
            r#"
            [network]
            ip_override = "not-an-ip"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_interval_strings_in_toml() {
        let config = RelayConfig::from_toml_str(
            r#"
            [supervisor]
            slow_interval = "5s"
            fast_interval = "250ms"

            [poller]
            interval = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.supervisor.slow_interval.as_millis(), 5000);
        assert_eq!(config.supervisor.fast_interval.as_millis(), 250);
        assert_eq!(config.poller.interval.as_millis(), 40);
    }

    #[test]
    fn test_zero_intervals_rejected() {
        for toml in [
            "[poller]\ninterval = 0\n",
            "[supervisor]\nfast_interval = 0\n",
            "[supervisor]\nslow_interval = \"0ms\"\n",
        ] {
            assert!(RelayConfig::from_toml_str(toml).is_err(), "{}", toml);
        }

        let mut config = RelayConfig::default();
        config.poller.interval = Interval::from_millis(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poller.interval"), "{}", err);
    }

    #[test]
    fn test_capacity_upper_bound() {
        let mut config = RelayConfig::default();
        config.facilities.capacity = MAX_FACILITY_CAPACITY;
        assert!(config.validate().is_ok());

        let result = RelayConfig::from_toml_str("[facilities]\ncapacity = 1000000000000\n");
        let Err(RelayError::Config(message)) = result else {
            panic!("oversized capacity accepted");
        };
        assert!(message.contains("at most"), "{}", message);
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("1.5").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_seconds("0").unwrap(), Duration::ZERO);
        assert!(parse_seconds("inf").is_err());
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn test_blank_override_is_unset() {
        let mut config = NetworkConfig::default();
        config.ip_override = Some("   ".to_string());
        assert_eq!(config.advertised_override(), None);
    }
}
