//! Simulated flight simulator host for running and testing the relay
//! without the real simulator.

mod facilities;
mod flight;
mod host;

pub use facilities::synthetic_facilities;
pub use flight::FlightModel;
pub use host::{HostHandle, SimulatedHost, SimulationConfig};
