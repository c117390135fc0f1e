use crate::error::{RelayError, Result};
use crate::facility::FacilityKind;

/// A decoded `<code>:<payload>` control datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// 0: primary map client announces its address
    RegisterMap(String),
    /// 1: client looks for the relay's advertised address
    Discover,
    /// 2: client asks for the active flight plan
    ActiveFlightPlan,
    /// 3: gauge client announces its address
    RegisterGauge(String),
    /// 4: lite-map client announces its address
    RegisterLiteMap(String),
    /// 5, 6, 7: refetch one facility list from the provider
    Refetch(FacilityKind),
}

impl ControlCommand {
    /// Decode a datagram
    ///
    /// The colon is mandatory; `"3:"` carries an empty payload. Only the first
    /// colon-separated payload segment is kept.
    pub fn parse(datagram: &str) -> Result<Self> {
        let malformed = |reason: &str| RelayError::ControlDatagram {
            datagram: datagram.to_string(),
            reason: reason.to_string(),
        };

        let Some((code, rest)) = datagram.split_once(':') else {
            return Err(malformed("missing ':'"));
        };
        let code: u32 = code
            .trim()
            .parse()
            .map_err(|_| malformed("non-numeric command code"))?;
        let payload = rest
            .split(':')
            .next()
            .unwrap_or_default()
            .trim_matches(|c: char| c.is_whitespace() || c == '\0')
            .to_string();

        match code {
            0 => Ok(ControlCommand::RegisterMap(payload)),
            1 => Ok(ControlCommand::Discover),
            2 => Ok(ControlCommand::ActiveFlightPlan),
            3 => Ok(ControlCommand::RegisterGauge(payload)),
            4 => Ok(ControlCommand::RegisterLiteMap(payload)),
            5 => Ok(ControlCommand::Refetch(FacilityKind::Airport)),
            6 => Ok(ControlCommand::Refetch(FacilityKind::Vor)),
            7 => Ok(ControlCommand::Refetch(FacilityKind::Ndb)),
            other => Err(malformed(&format!("unknown command code {}", other))),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ControlCommand::RegisterMap(_) => 0,
            ControlCommand::Discover => 1,
            ControlCommand::ActiveFlightPlan => 2,
            ControlCommand::RegisterGauge(_) => 3,
            ControlCommand::RegisterLiteMap(_) => 4,
            ControlCommand::Refetch(FacilityKind::Airport) => 5,
            ControlCommand::Refetch(FacilityKind::Vor) => 6,
            ControlCommand::Refetch(FacilityKind::Ndb) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_payload() {
        assert_eq!(
            ControlCommand::parse("0:192.168.1.20").unwrap(),
            ControlCommand::RegisterMap("192.168.1.20".to_string())
        );
        assert_eq!(
            ControlCommand::parse("3:10.0.0.7:extra").unwrap(),
            ControlCommand::RegisterGauge("10.0.0.7".to_string())
        );
        assert_eq!(
            ControlCommand::parse("4:").unwrap(),
            ControlCommand::RegisterLiteMap(String::new())
        );
    }

    #[test]
    fn test_codes_without_payload() {
        assert_eq!(ControlCommand::parse("1:").unwrap(), ControlCommand::Discover);
        assert_eq!(
            ControlCommand::parse("2:ignored").unwrap(),
            ControlCommand::ActiveFlightPlan
        );
        assert_eq!(
            ControlCommand::parse("6:").unwrap(),
            ControlCommand::Refetch(FacilityKind::Vor)
        );
    }

    #[test]
    fn test_code_round_trip() {
        for code in 0..=7 {
            let command = ControlCommand::parse(&format!("{}:", code)).unwrap();
            assert_eq!(command.code(), code);
        }
    }

    #[test]
    fn test_malformed() {
        for datagram in ["", "1", "x:1", "-1:", "8:", "99:payload", ":"] {
            assert!(
                matches!(
                    ControlCommand::parse(datagram),
                    Err(RelayError::ControlDatagram { .. })
                ),
                "{:?} should be rejected",
                datagram
            );
        }
    }

    #[test]
    fn test_trailing_nul_stripped() {
        assert_eq!(
            ControlCommand::parse("0:10.0.0.2\0\0").unwrap(),
            ControlCommand::RegisterMap("10.0.0.2".to_string())
        );
    }
}
