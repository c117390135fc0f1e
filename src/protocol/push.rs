use std::io;
use std::net::{SocketAddr, UdpSocket};

use super::clients::{ClientFeed, ClientRegistry};
use crate::config::NetworkConfig;
use crate::error::{RelayError, Result};

/// Somewhere a datagram can be sent
pub trait DatagramSink: Send + Sync {
    fn send_datagram(&self, payload: &[u8], target: SocketAddr) -> io::Result<usize>;
}

impl DatagramSink for UdpSocket {
    fn send_datagram(&self, payload: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.send_to(payload, target)
    }
}

/// Sends push messages to registered clients on their feed's port
pub struct PushSender {
    sink: Box<dyn DatagramSink>,
    map_port: u16,
    gauge_port: u16,
}

impl PushSender {
    pub fn new(sink: Box<dyn DatagramSink>, network: &NetworkConfig) -> Self {
        Self {
            sink,
            map_port: network.map_port,
            gauge_port: network.gauge_port,
        }
    }

    /// Push through an ephemeral socket on the configured bind address
    pub fn bind(network: &NetworkConfig) -> Result<Self> {
        let addr = SocketAddr::new(network.bind_address, 0);
        let socket = UdpSocket::bind(addr).map_err(|source| RelayError::Bind { addr, source })?;
        Ok(Self::new(Box::new(socket), network))
    }

    /// Client-side port of a feed; lite-map shares the gauge port
    pub fn port_for(&self, feed: ClientFeed) -> u16 {
        match feed {
            ClientFeed::Map => self.map_port,
            ClientFeed::Gauge | ClientFeed::LiteMap => self.gauge_port,
        }
    }

    /// Send `message` to the client registered for `feed`
    ///
    /// Returns `Ok(false)` when no client is registered.
    pub fn push(&self, clients: &ClientRegistry, feed: ClientFeed, message: &str) -> Result<bool> {
        let Some(ip) = clients.get(feed) else {
            return Ok(false);
        };
        let target = SocketAddr::new(ip, self.port_for(feed));
        self.sink
            .send_datagram(message.as_bytes(), target)
            .map_err(|source| RelayError::PushSend { target, source })?;
        log::trace!("Pushed {} bytes to {:?} client {}", message.len(), feed, target);
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;
    use std::io;
    use std::net::{IpAddr, SocketAddr};
    use std::sync::{Arc, Mutex};

    use super::DatagramSink;

    /// Records datagrams instead of sending them
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        inner: Arc<Mutex<RecordingInner>>,
    }

    #[derive(Default)]
    struct RecordingInner {
        sent: Vec<(SocketAddr, String)>,
        unreachable: HashSet<IpAddr>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every send to `ip` fail
        pub fn fail_for(&self, ip: IpAddr) {
            self.inner.lock().unwrap().unreachable.insert(ip);
        }

        pub fn sent(&self) -> Vec<(SocketAddr, String)> {
            self.inner.lock().unwrap().sent.clone()
        }

        pub fn clear(&self) {
            self.inner.lock().unwrap().sent.clear();
        }
    }

    impl DatagramSink for RecordingSink {
        fn send_datagram(&self, payload: &[u8], target: SocketAddr) -> io::Result<usize> {
            let mut inner = self.inner.lock().unwrap();
            if inner.unreachable.contains(&target.ip()) {
                return Err(io::Error::new(io::ErrorKind::HostUnreachable, "unreachable"));
            }
            inner
                .sent
                .push((target, String::from_utf8_lossy(payload).into_owned()));
            Ok(payload.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    #[test]
    fn test_ports_per_feed() {
        let sink = RecordingSink::new();
        let sender = PushSender::new(Box::new(sink.clone()), &NetworkConfig::default());
        let clients = ClientRegistry::new();
        clients.register(ClientFeed::Map, "10.0.0.1");
        clients.register(ClientFeed::LiteMap, "10.0.0.3");

        assert!(sender.push(&clients, ClientFeed::Map, "FM_FP_LOADED").unwrap());
        assert!(sender.push(&clients, ClientFeed::LiteMap, "hello").unwrap());
        assert!(!sender.push(&clients, ClientFeed::Gauge, "FG_GD:1").unwrap());

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "10.0.0.1:8005".parse().unwrap());
        assert_eq!(sent[0].1, "FM_FP_LOADED");
        assert_eq!(sent[1].0, "10.0.0.3:8006".parse().unwrap());
    }

    #[test]
    fn test_send_failure_is_reported() {
        let sink = RecordingSink::new();
        sink.fail_for("10.0.0.1".parse().unwrap());
        let sender = PushSender::new(Box::new(sink), &NetworkConfig::default());
        let clients = ClientRegistry::new();
        clients.register(ClientFeed::Map, "10.0.0.1");

        let err = sender.push(&clients, ClientFeed::Map, "FM_GPS:").unwrap_err();
        assert!(matches!(err, RelayError::PushSend { .. }));
    }
}
