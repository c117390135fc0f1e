//! Boundary to the simulator's telemetry provider.
//!
//! The relay needs six things from a provider: host liveness, attach and
//! detach, sample schema registration, asynchronous sample delivery,
//! asynchronous facility list delivery, and notifications (open, quit,
//! exception, flight plan loaded). Deliveries arrive as [`ProviderEvent`]s
//! on the channel handed over in [`TelemetryProvider::attach`], and are
//! consumed by the relay's dispatch thread.

#[cfg(test)]
pub(crate) mod mock;
pub mod schema;

use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::error::Result;
use crate::facility::{FacilityKind, FacilityRecord};

pub use schema::{DataType, FieldSpec, SAMPLE_SCHEMA, SampleSchema, SchemaTarget};

/// Tag attached to a request and echoed back with its delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u32);

impl RequestId {
    /// Periodic user-aircraft sample request
    pub const TELEMETRY: RequestId = RequestId(0);
    /// One-shot facility list request
    pub const FACILITIES: RequestId = RequestId(2);
}

/// A single marshalled value of a sample
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Float(f64),
    Text(String),
}

/// Sample values in the order of the registered [`SampleSchema`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSample {
    pub values: Vec<RawValue>,
}

/// Notifications and deliveries from the provider
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// Session accepted by the host
    Open { application: String },
    /// Host is shutting down; the session is gone
    Quit,
    /// Provider rejected or failed a call; usually benign
    Exception { code: u32 },
    Sample {
        request: RequestId,
        sample: RawSample,
    },
    Facilities {
        request: RequestId,
        kind: FacilityKind,
        records: Vec<FacilityRecord>,
    },
    /// The host loaded a flight plan from this file
    FlightPlanLoaded { path: PathBuf },
}

/// A telemetry provider the connection supervisor can drive
///
/// Calls are made from the supervisor tick thread and the control thread,
/// always under the supervisor's lock.
pub trait TelemetryProvider: Send {
    /// Whether a host process whose name starts with `process_name` runs
    fn host_running(&mut self, process_name: &str) -> bool;

    /// Open a session; events are delivered on `events` until detach
    fn attach(&mut self, events: Sender<ProviderEvent>) -> Result<()>;

    fn register_schema(&mut self, schema: &SampleSchema) -> Result<()>;

    /// Ask for one user-aircraft sample; the answer arrives later as
    /// [`ProviderEvent::Sample`]
    fn request_sample(&mut self, request: RequestId) -> Result<()>;

    /// Ask for the facilities near the user aircraft; the answer arrives
    /// later as [`ProviderEvent::Facilities`]
    fn request_facilities(&mut self, kind: FacilityKind, request: RequestId) -> Result<()>;

    /// Close the session and release whatever attach acquired. Safe to call
    /// on a partially attached or detached provider.
    fn detach(&mut self);
}

/// Case-insensitive process name prefix match
pub fn matches_host_process(candidate: &str, process_name: &str) -> bool {
    candidate
        .to_lowercase()
        .starts_with(&process_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_process_match() {
        assert!(matches_host_process("fsx.exe", "fsx"));
        assert!(matches_host_process("FSX", "fsx"));
        assert!(!matches_host_process("prepar3d.exe", "fsx"));
    }
}
