//! Provider connection lifecycle.
//!
//! While disconnected the supervisor probes for the host on the slow
//! interval and attaches when it appears. While connected it requests one
//! sample per fast tick. The host's quit notification is what ends a
//! session; failed sample requests are expected while the host winds down
//! and are not treated as a disconnect.
//!
//! Provider events are handed to [`ConnectionSupervisor::handle_event`] by
//! the relay's dispatch thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::context::{AppContext, ConnectionState};
use crate::error::{RelayError, Result};
use crate::facility::FacilityKind;
use crate::flightplan::{self, FlightPlan, ParseOutcome};
use crate::protocol::FacilityRequester;
use crate::provider::{ProviderEvent, RequestId, SAMPLE_SCHEMA, TelemetryProvider};
use crate::telemetry::normalize;

/// What the supervisor tells the client side about
pub trait RelayEvents: Send + Sync {
    /// A facility delivery was ingested into the registry of `kind`
    fn facilities_updated(&self, kind: FacilityKind);

    fn flight_plan_loaded(&self);
}

pub struct ConnectionSupervisor {
    ctx: Arc<AppContext>,
    provider: Mutex<Box<dyn TelemetryProvider>>,
    events: Sender<ProviderEvent>,
    notifier: Arc<dyn RelayEvents>,
    tick_interval_ms: AtomicU64,
}

impl ConnectionSupervisor {
    /// Fails if the built-in sample schema does not cover the snapshot
    pub fn new(
        ctx: Arc<AppContext>,
        provider: Box<dyn TelemetryProvider>,
        events: Sender<ProviderEvent>,
        notifier: Arc<dyn RelayEvents>,
    ) -> Result<Self> {
        SAMPLE_SCHEMA.validate()?;
        let slow = ctx.config.supervisor.slow_interval.as_millis();
        Ok(Self {
            ctx,
            provider: Mutex::new(provider),
            events,
            notifier,
            tick_interval_ms: AtomicU64::new(slow),
        })
    }

    fn provider(&self) -> MutexGuard<'_, Box<dyn TelemetryProvider>> {
        self.provider.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.load(Ordering::Relaxed))
    }

    fn set_tick_interval(&self, interval: Duration) {
        self.tick_interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    /// Facilities and flight plan belong to one provider session
    fn reset_session_state(&self) {
        self.ctx.facilities.clear_all();
        self.ctx.replace_flight_plan(FlightPlan::default());
    }

    /// One step of the state machine
    pub fn tick(&self) {
        match self.ctx.connection_state() {
            ConnectionState::Disconnected => self.try_attach(),
            ConnectionState::Connected => {
                if let Err(e) = self.provider().request_sample(RequestId::TELEMETRY) {
                    log::debug!("Sample request failed, host may be closing: {}", e);
                }
            }
            ConnectionState::Connecting => {}
        }
    }

    fn try_attach(&self) {
        let config = &self.ctx.config.supervisor;
        let mut provider = self.provider();
        if !provider.host_running(&config.host_process) {
            log::trace!("Host {:?} not running", config.host_process);
            return;
        }

        self.ctx.set_connection_state(ConnectionState::Connecting);
        let attached = provider
            .attach(self.events.clone())
            .and_then(|()| provider.register_schema(&SAMPLE_SCHEMA));

        match attached {
            Ok(()) => {
                self.reset_session_state();
                self.ctx.set_connection_state(ConnectionState::Connected);
                self.set_tick_interval(config.fast_interval.as_duration());
                log::info!("Attached to {}", config.host_process);
            }
            Err(e) => {
                provider.detach();
                self.ctx.set_connection_state(ConnectionState::Disconnected);
                log::warn!("Attach failed, retrying in {}: {}", config.slow_interval, e);
            }
        }
    }

    fn disconnect(&self) {
        self.provider().detach();
        self.reset_session_state();
        self.ctx.set_connection_state(ConnectionState::Disconnected);
        self.set_tick_interval(self.ctx.config.supervisor.slow_interval.as_duration());
    }

    /// React to one provider notification or delivery
    ///
    /// Events arriving after shutdown are ignored.
    pub fn handle_event(&self, event: ProviderEvent) {
        if self.ctx.shutdown.is_triggered() {
            log::trace!("Ignoring provider event during shutdown: {:?}", event);
            return;
        }

        match event {
            ProviderEvent::Open { application } => {
                log::info!("Provider session opened by {}", application);
            }
            ProviderEvent::Quit => {
                log::info!("Host has exited");
                self.disconnect();
            }
            ProviderEvent::Exception { code } => {
                log::debug!("Provider exception {}", code);
            }
            ProviderEvent::Sample { request, sample } => {
                if request != RequestId::TELEMETRY {
                    log::warn!("Sample for unknown request {}", request.0);
                    return;
                }
                let previous = self.ctx.snapshot();
                match normalize(&SAMPLE_SCHEMA, &sample, previous.as_deref()) {
                    Ok(snapshot) => self.ctx.publish_snapshot(snapshot),
                    Err(e) => log::warn!("Dropping sample: {}", e),
                }
            }
            ProviderEvent::Facilities {
                request,
                kind,
                records,
            } => {
                if request != RequestId::FACILITIES {
                    log::warn!("{} delivery for unknown request {}", kind, request.0);
                    return;
                }
                let report = self.ctx.facilities.ingest(records);
                log::info!(
                    "Added {} {}, skipped {} duplicates, evicted {}",
                    report.added,
                    kind,
                    report.skipped,
                    report.evicted
                );
                self.notifier.facilities_updated(kind);
            }
            ProviderEvent::FlightPlanLoaded { path } => {
                log::info!("Loading flight plan {}", path.display());
                let mut plan = FlightPlan::default();
                let outcome = flightplan::load_file(&path, &mut plan);
                self.ctx.replace_flight_plan(plan);
                match outcome {
                    ParseOutcome::Loaded { format, waypoints } => {
                        log::info!("Loaded {} flight plan with {} waypoints", format, waypoints);
                        self.notifier.flight_plan_loaded();
                    }
                    ParseOutcome::Failed { retained, error } => {
                        log::warn!("{} ({} waypoints kept)", error, retained);
                    }
                }
            }
        }
    }

    /// Detach from the provider and stop advertising a connection
    pub fn release(&self) {
        self.provider().detach();
        self.ctx.set_connection_state(ConnectionState::Disconnected);
    }

    /// Tick until shutdown, then release the provider
    pub fn run(&self) {
        log::info!("Connection supervisor started");
        loop {
            self.tick();
            if self.ctx.shutdown.wait(self.tick_interval()) {
                break;
            }
        }
        self.release();
        log::info!("Connection supervisor stopped");
    }
}

impl FacilityRequester for ConnectionSupervisor {
    /// Clear the registry of `kind` and ask the provider to refill it
    fn request_facilities(&self, kind: FacilityKind) -> Result<()> {
        self.ctx.facilities.get(kind).clear();
        if self.ctx.connection_state() != ConnectionState::Connected {
            return Err(RelayError::NotConnected(kind));
        }
        self.provider()
            .request_facilities(kind, RequestId::FACILITIES)
    }
}
