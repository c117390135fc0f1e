use std::net::IpAddr;
use std::sync::Mutex;

use crate::constants::UNSPECIFIED_CLIENT;

/// Logical client families, one remembered address each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ClientFeed {
    Map,
    Gauge,
    LiteMap,
}

impl ClientFeed {
    pub const ALL: [ClientFeed; 3] = [ClientFeed::Map, ClientFeed::Gauge, ClientFeed::LiteMap];

    fn slot(self) -> usize {
        match self {
            ClientFeed::Map => 0,
            ClientFeed::Gauge => 1,
            ClientFeed::LiteMap => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Stored(IpAddr),
    /// Empty, unspecified or unparsable declaration; previous address kept
    Ignored,
}

/// Last declared address of each client feed
#[derive(Debug, Default)]
pub struct ClientRegistry {
    addresses: Mutex<[Option<IpAddr>; 3]>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `declared` for `feed`, replacing any earlier address
    pub fn register(&self, feed: ClientFeed, declared: &str) -> Registration {
        let declared = declared.trim();
        if declared.is_empty() || declared == UNSPECIFIED_CLIENT {
            return Registration::Ignored;
        }
        let Ok(addr) = declared.parse::<IpAddr>() else {
            log::warn!("Ignoring {:?} registration with address {:?}", feed, declared);
            return Registration::Ignored;
        };
        if addr.is_unspecified() {
            return Registration::Ignored;
        }
        let mut addresses = self.addresses.lock().unwrap_or_else(|e| e.into_inner());
        addresses[feed.slot()] = Some(addr);
        Registration::Stored(addr)
    }

    pub fn get(&self, feed: ClientFeed) -> Option<IpAddr> {
        let addresses = self.addresses.lock().unwrap_or_else(|e| e.into_inner());
        addresses[feed.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_overwrite() {
        let clients = ClientRegistry::new();
        assert_eq!(clients.get(ClientFeed::Map), None);

        let first: IpAddr = "192.168.1.20".parse().unwrap();
        assert_eq!(clients.register(ClientFeed::Map, "192.168.1.20"), Registration::Stored(first));
        assert_eq!(clients.register(ClientFeed::Map, "192.168.1.20"), Registration::Stored(first));
        assert_eq!(clients.get(ClientFeed::Map), Some(first));

        clients.register(ClientFeed::Map, "192.168.1.21");
        assert_eq!(clients.get(ClientFeed::Map), Some("192.168.1.21".parse().unwrap()));
        assert_eq!(clients.get(ClientFeed::Gauge), None);
    }

    #[test]
    fn test_unspecified_never_stored() {
        let clients = ClientRegistry::new();
        clients.register(ClientFeed::Gauge, "10.0.0.5");
        for declared in ["0.0.0.0", "", "  ", "not-an-ip", "::"] {
            assert_eq!(clients.register(ClientFeed::Gauge, declared), Registration::Ignored);
        }
        assert_eq!(clients.get(ClientFeed::Gauge), Some("10.0.0.5".parse().unwrap()));
    }

    #[test]
    fn test_feeds_are_independent() {
        let clients = ClientRegistry::new();
        clients.register(ClientFeed::Map, "10.0.0.1");
        clients.register(ClientFeed::Gauge, "10.0.0.2");
        clients.register(ClientFeed::LiteMap, "10.0.0.3");
        for (feed, last) in ClientFeed::ALL.into_iter().zip(1..) {
            assert_eq!(clients.get(feed), Some(format!("10.0.0.{}", last).parse().unwrap()));
        }
    }
}
