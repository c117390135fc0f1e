use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::facility::FacilityKind;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Provider attach failed: {0}")]
    ProviderAttach(String),

    #[error("Provider request failed: {0}")]
    ProviderRequest(String),

    #[error("Provider is not connected; cannot request {0}")]
    NotConnected(FacilityKind),

    #[error("Sample schema invalid: {0}")]
    Schema(String),

    #[error("Malformed sample: {0}")]
    Sample(String),

    #[error("Flight plan {path} could not be parsed: {reason}")]
    FlightPlanParse { path: PathBuf, reason: String },

    #[error("Malformed control datagram {datagram:?}: {reason}")]
    ControlDatagram { datagram: String, reason: String },

    #[error("Push to {target} failed: {source}")]
    PushSend {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
