//! State shared between the relay loops.
//!
//! Each loop gets an `Arc<AppContext>` at construction. Every field that
//! crosses loops sits behind a lock; snapshots are immutable and swapped
//! whole.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::config::RelayConfig;
use crate::facility::FacilityRegistries;
use crate::flightplan::FlightPlan;
use crate::protocol::ClientRegistry;
use crate::shutdown::Shutdown;
use crate::telemetry::TelemetrySnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Host found, attach in progress
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

pub struct AppContext {
    pub config: RelayConfig,
    pub facilities: FacilityRegistries,
    pub clients: ClientRegistry,
    pub shutdown: Shutdown,
    connection: RwLock<ConnectionState>,
    snapshot: RwLock<Option<Arc<TelemetrySnapshot>>>,
    flight_plan: RwLock<FlightPlan>,
}

impl AppContext {
    pub fn new(config: RelayConfig) -> Self {
        let facilities = FacilityRegistries::new(config.facilities.capacity);
        Self {
            config,
            facilities,
            clients: ClientRegistry::new(),
            shutdown: Shutdown::new(),
            connection: RwLock::new(ConnectionState::Disconnected),
            snapshot: RwLock::new(None),
            flight_plan: RwLock::new(FlightPlan::default()),
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Only the connection supervisor moves the state
    pub(crate) fn set_connection_state(&self, state: ConnectionState) {
        *self.connection.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Latest published snapshot; stays in place after a disconnect
    pub fn snapshot(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(crate) fn publish_snapshot(&self, snapshot: TelemetrySnapshot) {
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(snapshot));
    }

    /// Run `f` against the current flight plan
    pub fn with_flight_plan<R>(&self, f: impl FnOnce(&FlightPlan) -> R) -> R {
        let plan = self.flight_plan.read().unwrap_or_else(|e| e.into_inner());
        f(&*plan)
    }

    pub(crate) fn replace_flight_plan(&self, plan: FlightPlan) {
        *self.flight_plan.write().unwrap_or_else(|e| e.into_inner()) = plan;
    }
}
