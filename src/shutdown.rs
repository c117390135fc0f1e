//! Cooperative cancellation shared by every relay loop.
//!
//! Triggering drops the only sender, so every `recv_timeout` on the receiver
//! returns `Disconnected` at once. Loops wait on [`Shutdown::wait`] instead
//! of sleeping, or select on [`Shutdown::receiver`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

#[derive(Clone)]
pub struct Shutdown {
    triggered: Arc<AtomicBool>,
    sender: Arc<Mutex<Option<Sender<()>>>>,
    receiver: Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            log::info!("Shutdown requested");
        }
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Sleep for up to `timeout`; true if shutdown was triggered meanwhile
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => self.is_triggered(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    /// Becomes ready (disconnected) once shutdown is triggered
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
