use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::clients::{ClientFeed, Registration};
use super::command::ControlCommand;
use super::discovery::Discovery;
use super::push::DatagramSink;
use crate::constants::{MAX_CONTROL_DATAGRAM, PROTOCOL_VERSION};
use crate::context::AppContext;
use crate::error::{RelayError, Result};
use crate::facility::FacilityKind;
use crate::output::active_flight_plan;

/// Read timeout on the control socket; bounds shutdown latency
const RECV_POLL: Duration = Duration::from_millis(100);

/// Refetch seam between the control server and the connection supervisor
pub trait FacilityRequester: Send + Sync {
    fn request_facilities(&self, kind: FacilityKind) -> Result<()>;
}

/// Outbound half of the control socket
///
/// Replies go to the sender of a request. Facility lists arrive later and go
/// to whoever sent the most recent datagram.
pub struct ControlChannel {
    sink: Box<dyn DatagramSink>,
    last_requester: Mutex<Option<SocketAddr>>,
}

impl ControlChannel {
    pub fn new(sink: Box<dyn DatagramSink>) -> Self {
        Self {
            sink,
            last_requester: Mutex::new(None),
        }
    }

    pub fn note_requester(&self, addr: SocketAddr) {
        *self.last_requester.lock().unwrap_or_else(|e| e.into_inner()) = Some(addr);
    }

    pub fn last_requester(&self) -> Option<SocketAddr> {
        *self.last_requester.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn reply(&self, to: SocketAddr, message: &str) {
        if let Err(e) = self.sink.send_datagram(message.as_bytes(), to) {
            log::warn!("Control reply to {} failed: {}", to, e);
        }
    }

    /// Send to the most recent requester; false if nobody asked yet
    pub fn send_to_last_requester(&self, message: &str) -> bool {
        match self.last_requester() {
            Some(to) => {
                self.reply(to, message);
                true
            }
            None => false,
        }
    }
}

pub struct ControlServer {
    ctx: Arc<AppContext>,
    channel: Arc<ControlChannel>,
    discovery: Discovery,
    requester: Arc<dyn FacilityRequester>,
}

impl ControlServer {
    pub fn new(
        ctx: Arc<AppContext>,
        channel: Arc<ControlChannel>,
        requester: Arc<dyn FacilityRequester>,
    ) -> Self {
        let discovery = Discovery::new(ctx.config.network.advertised_override());
        Self {
            ctx,
            channel,
            discovery,
            requester,
        }
    }

    fn register(&self, feed: ClientFeed, declared: &str, reply_prefix: &str) -> String {
        match self.ctx.clients.register(feed, declared) {
            Registration::Stored(ip) => log::info!("{:?} client registered at {}", feed, ip),
            Registration::Ignored => {
                log::debug!("{:?} client registration without usable address", feed)
            }
        }
        format!("{}:{}", reply_prefix, PROTOCOL_VERSION)
    }

    /// Apply one command; returns the synchronous reply, if any
    pub fn handle(&self, command: ControlCommand) -> Option<String> {
        match command {
            ControlCommand::RegisterMap(declared) => {
                Some(self.register(ClientFeed::Map, &declared, "FM_CONNECT"))
            }
            ControlCommand::RegisterGauge(declared) => {
                Some(self.register(ClientFeed::Gauge, &declared, "FG_CONNECT"))
            }
            ControlCommand::RegisterLiteMap(declared) => {
                Some(self.register(ClientFeed::LiteMap, &declared, "FML_CONNECT"))
            }
            ControlCommand::Discover => Some(format!(
                "DISCOVER_FM_RESPONSE:{}",
                self.discovery.advertised()
            )),
            ControlCommand::ActiveFlightPlan => Some(self.ctx.with_flight_plan(active_flight_plan)),
            ControlCommand::Refetch(kind) => {
                match self.requester.request_facilities(kind) {
                    Ok(()) => log::info!("Requested {} from provider", kind),
                    Err(e @ RelayError::NotConnected(_)) => log::warn!("{}", e),
                    Err(e) => log::error!("Refetch of {} failed: {}", kind, e),
                }
                None
            }
        }
    }

    /// Decode and answer one inbound datagram
    pub fn handle_datagram(&self, bytes: &[u8], from: SocketAddr) {
        self.channel.note_requester(from);
        let text = String::from_utf8_lossy(bytes);
        let command = match ControlCommand::parse(&text) {
            Ok(command) => command,
            Err(e) => {
                log::warn!("Dropping datagram from {}: {}", from, e);
                return;
            }
        };
        log::debug!("Command {} from {}", command.code(), from);
        if let Some(reply) = self.handle(command) {
            self.channel.reply(from, &reply);
        }
    }

    /// Receive loop; returns once shutdown is triggered
    pub fn run(self, socket: UdpSocket) {
        if let Err(e) = socket.set_read_timeout(Some(RECV_POLL)) {
            log::error!("Cannot set control socket timeout: {}", e);
            return;
        }
        log::info!(
            "Control server listening on {}",
            socket
                .local_addr()
                .map_or_else(|_| "?".to_string(), |a| a.to_string())
        );

        let mut buffer = [0u8; MAX_CONTROL_DATAGRAM];
        while !self.ctx.shutdown.is_triggered() {
            let (len, from) = match socket.recv_from(&mut buffer) {
                Ok(received) => received,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    continue;
                }
                // Windows reports an earlier send's ICMP unreachable here
                Err(e) if e.kind() == ErrorKind::ConnectionReset => continue,
                Err(e) => {
                    log::error!("Control socket receive failed: {}", e);
                    continue;
                }
            };
            self.handle_datagram(&buffer[..len], from);
        }
        log::info!("Control server stopped");
    }
}
