//! Wire-level constants shared by the relay and its clients.
//!
//! Changing any of these breaks compatibility with deployed map and gauge
//! clients.

/// Decimal places kept on every numeric value that goes out on the wire.
pub const WIRE_DECIMALS: i32 = 5;

/// Registration address clients send when they do not know their own address.
pub const UNSPECIFIED_CLIENT: &str = "0.0.0.0";

/// VOR capability flag bit advertising DME.
pub const VOR_FLAG_HAS_DME: u32 = 0x0000_0008;

/// Default UDP port for control requests.
pub const DEFAULT_CONTROL_PORT: u16 = 8004;

/// Default UDP port for the primary map feed.
pub const DEFAULT_MAP_PORT: u16 = 8005;

/// Default UDP port for the gauge feed (also used by lite-map clients).
pub const DEFAULT_GAUGE_PORT: u16 = 8006;

/// Default bound on each facility registry.
pub const DEFAULT_FACILITY_CAPACITY: usize = 500;

/// Largest facility registry capacity a configuration may ask for.
pub const MAX_FACILITY_CAPACITY: usize = 100_000;

/// Largest control datagram we accept.
pub const MAX_CONTROL_DATAGRAM: usize = 1024;

/// Token identifying waypoint lines in legacy flight plans.
pub const LEGACY_WAYPOINT_MARKER: &str = "waypoint.";

/// Version advertised in registration replies.
pub const PROTOCOL_VERSION: &str = "2.8";
