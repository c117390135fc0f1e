use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::Sender;
use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::facilities::synthetic_facilities;
use super::flight::FlightModel;
use crate::error::{RelayError, Result};
use crate::facility::FacilityKind;
use crate::provider::{
    ProviderEvent, RequestId, SampleSchema, TelemetryProvider, matches_host_process,
};

const APPLICATION_NAME: &str = "Simulated Flight Host";

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    /// Process name the simulated host runs under
    pub process_name: String,
    /// Starting position as (latitude, longitude)
    pub origin: (f64, f64),
    /// Simulated seconds advanced per sample request
    pub step_seconds: f64,
    pub facilities_per_kind: usize,
    /// Repeat an identifier every this many facility records; 0 disables
    pub duplicate_every: usize,
    /// Probability that a sample carries a blank waypoint name
    pub blank_name_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            process_name: "fsx.exe".to_string(),
            origin: (41.8, 12.25),
            step_seconds: 0.1,
            facilities_per_kind: 40,
            duplicate_every: 7,
            blank_name_rate: 0.1,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_facilities(mut self, per_kind: usize, duplicate_every: usize) -> Self {
        self.facilities_per_kind = per_kind;
        self.duplicate_every = duplicate_every;
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

#[derive(Default)]
struct HostState {
    running: bool,
    fail_next_attach: bool,
    session: Option<Sender<ProviderEvent>>,
    registered_fields: usize,
}

/// Controls the simulated host from outside the relay
///
/// Clones share state with the `SimulatedHost` they came from.
#[derive(Clone, Default)]
pub struct HostHandle {
    state: Arc<Mutex<HostState>>,
}

impl HostHandle {
    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sender for the live session, if any
    fn session(&self) -> Option<Sender<ProviderEvent>> {
        self.lock().session.clone()
    }

    fn notify(&self, event: ProviderEvent) -> bool {
        match self.session() {
            Some(events) => events.send(event).is_ok(),
            None => false,
        }
    }

    pub fn set_running(&self, running: bool) {
        self.lock().running = running;
    }

    pub fn is_attached(&self) -> bool {
        self.lock().session.is_some()
    }

    /// Make the next attach attempt fail once
    pub fn fail_next_attach(&self) {
        self.lock().fail_next_attach = true;
    }

    /// Host shuts down: the session sees a quit and the process goes away
    pub fn quit(&self) -> bool {
        self.lock().running = false;
        self.notify(ProviderEvent::Quit)
    }

    pub fn raise_exception(&self, code: u32) -> bool {
        self.notify(ProviderEvent::Exception { code })
    }

    /// The host user loads a flight plan file
    pub fn load_flight_plan(&self, path: impl Into<PathBuf>) -> bool {
        self.notify(ProviderEvent::FlightPlanLoaded { path: path.into() })
    }
}

/// In-process stand-in for the flight simulator
///
/// Requests are answered immediately on the session channel, so the relay
/// sees the same asynchronous event flow as with a real host.
pub struct SimulatedHost {
    config: SimulationConfig,
    handle: HostHandle,
    flight: FlightModel,
    rng: ChaCha8Rng,
    schema: Option<SampleSchema>,
}

impl SimulatedHost {
    pub fn new(config: SimulationConfig) -> Self {
        let mut rng = create_rng(config.seed);
        let flight_rng = ChaCha8Rng::seed_from_u64(rng.random::<u64>());
        let flight = FlightModel::new(
            flight_rng,
            config.origin.0,
            config.origin.1,
            config.blank_name_rate,
        );
        let handle = HostHandle::default();
        handle.set_running(true);
        Self {
            config,
            handle,
            flight,
            rng,
            schema: None,
        }
    }

    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    fn session(&self) -> Result<Sender<ProviderEvent>> {
        self.handle
            .session()
            .ok_or_else(|| RelayError::ProviderRequest("no open session".to_string()))
    }

    fn deliver(&self, event: ProviderEvent) -> Result<()> {
        self.session()?
            .send(event)
            .map_err(|_| RelayError::ProviderRequest("session receiver dropped".to_string()))
    }
}

impl TelemetryProvider for SimulatedHost {
    fn host_running(&mut self, process_name: &str) -> bool {
        self.handle.lock().running && matches_host_process(&self.config.process_name, process_name)
    }

    fn attach(&mut self, events: Sender<ProviderEvent>) -> Result<()> {
        {
            let mut state = self.handle.lock();
            if std::mem::take(&mut state.fail_next_attach) {
                return Err(RelayError::ProviderAttach("host refused connection".to_string()));
            }
            if !state.running {
                return Err(RelayError::ProviderAttach("host is not running".to_string()));
            }
            state.session = Some(events);
        }
        log::debug!("Simulated host session opened");
        self.deliver(ProviderEvent::Open {
            application: APPLICATION_NAME.to_string(),
        })
    }

    fn register_schema(&mut self, schema: &SampleSchema) -> Result<()> {
        self.session()?;
        schema.validate()?;
        self.handle.lock().registered_fields = schema.len();
        self.schema = Some(*schema);
        Ok(())
    }

    fn request_sample(&mut self, request: RequestId) -> Result<()> {
        let Some(schema) = self.schema else {
            return Err(RelayError::ProviderRequest("no schema registered".to_string()));
        };
        self.flight.step(self.config.step_seconds);
        let sample = self.flight.sample(&schema);
        self.deliver(ProviderEvent::Sample { request, sample })
    }

    fn request_facilities(&mut self, kind: FacilityKind, request: RequestId) -> Result<()> {
        let records = synthetic_facilities(
            &mut self.rng,
            kind,
            self.config.facilities_per_kind,
            self.config.duplicate_every,
            self.config.origin,
        );
        self.deliver(ProviderEvent::Facilities {
            request,
            kind,
            records,
        })
    }

    fn detach(&mut self) {
        let mut state = self.handle.lock();
        if state.session.take().is_some() {
            log::debug!("Simulated host session closed");
        }
        state.registered_fields = 0;
        self.schema = None;
    }
}
