//! Scriptable provider for unit tests

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::Sender;

use super::{ProviderEvent, RequestId, SampleSchema, TelemetryProvider};
use crate::error::{RelayError, Result};
use crate::facility::FacilityKind;

#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Default)]
pub struct MockInner {
    pub host_running: bool,
    pub fail_attach: bool,
    pub fail_requests: bool,
    pub attached: bool,
    pub events: Option<Sender<ProviderEvent>>,
    pub calls: Vec<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.state().calls.iter().filter(|c| c.starts_with(call)).count()
    }
}

impl TelemetryProvider for MockProvider {
    fn host_running(&mut self, process_name: &str) -> bool {
        let mut state = self.state();
        state.calls.push(format!("host_running {}", process_name));
        state.host_running
    }

    fn attach(&mut self, events: Sender<ProviderEvent>) -> Result<()> {
        let mut state = self.state();
        state.calls.push("attach".to_string());
        if state.fail_attach {
            return Err(RelayError::ProviderAttach("host refused".to_string()));
        }
        state.attached = true;
        state.events = Some(events);
        Ok(())
    }

    fn register_schema(&mut self, schema: &SampleSchema) -> Result<()> {
        self.state()
            .calls
            .push(format!("register_schema {}", schema.len()));
        Ok(())
    }

    fn request_sample(&mut self, request: RequestId) -> Result<()> {
        let mut state = self.state();
        state.calls.push(format!("request_sample {}", request.0));
        if state.fail_requests {
            return Err(RelayError::ProviderRequest("host closing".to_string()));
        }
        Ok(())
    }

    fn request_facilities(&mut self, kind: FacilityKind, request: RequestId) -> Result<()> {
        self.state()
            .calls
            .push(format!("request_facilities {:?} {}", kind, request.0));
        Ok(())
    }

    fn detach(&mut self) {
        let mut state = self.state();
        state.calls.push("detach".to_string());
        state.attached = false;
        state.events = None;
    }
}
