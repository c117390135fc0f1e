pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod facility;
pub mod flightplan;
pub mod logging;
pub mod output;
pub mod poller;
pub mod protocol;
pub mod provider;
pub mod relay;
pub mod shutdown;
pub mod supervisor;
pub mod telemetry;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
