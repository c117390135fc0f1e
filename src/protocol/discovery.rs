use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::sync::Mutex;

/// Primary IPv4 address of this host
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface.
pub fn detect_local_ipv4() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    if ip.is_unspecified() { None } else { Some(ip) }
}

/// Address advertised to clients in discovery replies
pub struct Discovery {
    override_ip: Option<String>,
    current: Mutex<Option<IpAddr>>,
}

impl Discovery {
    pub fn new(override_ip: Option<&str>) -> Self {
        Self {
            override_ip: override_ip.map(str::to_string),
            current: Mutex::new(None),
        }
    }

    /// The configured override, or the freshly detected address
    pub fn advertised(&self) -> String {
        if let Some(ip) = &self.override_ip {
            return ip.clone();
        }

        let detected = detect_local_ipv4().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        match *current {
            Some(previous) if previous != detected => {
                log::info!("Advertised address changed from {} to {}", previous, detected);
            }
            None => log::info!("Advertising address {}", detected),
            _ => {}
        }
        *current = Some(detected);
        detected.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let discovery = Discovery::new(Some("10.1.2.3"));
        assert_eq!(discovery.advertised(), "10.1.2.3");
    }

    #[test]
    fn test_detected_address_is_ipv4() {
        let discovery = Discovery::new(None);
        let ip: IpAddr = discovery.advertised().parse().unwrap();
        assert!(ip.is_ipv4());
        assert!(!ip.is_unspecified());
    }
}
