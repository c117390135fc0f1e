use std::fmt;

use crate::constants::VOR_FLAG_HAS_DME;
use crate::telemetry::round_wire;

/// Facility family, one registry each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum FacilityKind {
    Airport,
    Vor,
    Ndb,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 3] = [FacilityKind::Airport, FacilityKind::Vor, FacilityKind::Ndb];
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityKind::Airport => write!(f, "airports"),
            FacilityKind::Vor => write!(f, "VORs"),
            FacilityKind::Ndb => write!(f, "NDBs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub icao: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vor {
    pub icao: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Frequency in Hz as reported by the provider
    pub frequency: u32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ndb {
    pub icao: String,
    pub latitude: f64,
    pub longitude: f64,
    pub frequency: f64,
    pub altitude: f64,
}

impl Vor {
    pub fn has_dme(&self) -> bool {
        self.flags & VOR_FLAG_HAS_DME != 0
    }
}

/// A navigational facility held in a registry
///
/// Coordinates and altitudes are rounded to wire precision on construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FacilityRecord {
    Airport(Airport),
    Vor(Vor),
    Ndb(Ndb),
}

impl FacilityRecord {
    pub fn airport(icao: impl Into<String>, latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self::Airport(Airport {
            icao: icao.into(),
            latitude: round_wire(latitude),
            longitude: round_wire(longitude),
            altitude: round_wire(altitude),
        })
    }

    pub fn vor(
        icao: impl Into<String>,
        latitude: f64,
        longitude: f64,
        frequency: u32,
        flags: u32,
    ) -> Self {
        Self::Vor(Vor {
            icao: icao.into(),
            latitude: round_wire(latitude),
            longitude: round_wire(longitude),
            frequency,
            flags,
        })
    }

    pub fn ndb(
        icao: impl Into<String>,
        latitude: f64,
        longitude: f64,
        frequency: f64,
        altitude: f64,
    ) -> Self {
        Self::Ndb(Ndb {
            icao: icao.into(),
            latitude: round_wire(latitude),
            longitude: round_wire(longitude),
            frequency,
            altitude: round_wire(altitude),
        })
    }

    /// Identifier used as the registry dedup key
    pub fn icao(&self) -> &str {
        match self {
            Self::Airport(a) => &a.icao,
            Self::Vor(v) => &v.icao,
            Self::Ndb(n) => &n.icao,
        }
    }

    pub fn kind(&self) -> FacilityKind {
        match self {
            Self::Airport(_) => FacilityKind::Airport,
            Self::Vor(_) => FacilityKind::Vor,
            Self::Ndb(_) => FacilityKind::Ndb,
        }
    }
}
