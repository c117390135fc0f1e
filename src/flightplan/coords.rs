//! Coordinate strings found in flight plan files.
//!
//! Modern plans carry degrees, minutes and seconds:
//! `N41° 48' 46.70",E12° 16' 31.10",+000014.00`
//!
//! Legacy plans carry degrees and decimal minutes, one string per axis:
//! `N51* 40.19'` and `W0* 41.92'`

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordError {
    #[error("{axis} missing in {input:?}")]
    MissingComponent { axis: &'static str, input: String },

    #[error("no number in {0:?}")]
    BadNumber(String),
}

/// Keep only digits and the decimal point, then parse
fn extract_number(token: &str) -> Result<f64, CoordError> {
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits
        .parse()
        .map_err(|_| CoordError::BadNumber(token.to_string()))
}

/// Southern and western hemispheres are negative
fn hemisphere_sign(token: &str) -> f64 {
    if token.starts_with('S') || token.starts_with('W') {
        -1.0
    } else {
        1.0
    }
}

/// Convert one `<h><deg>° <min>' <sec>"` component to signed decimal degrees
pub fn dms_to_decimal(component: &str, axis: &'static str) -> Result<f64, CoordError> {
    let tokens: Vec<&str> = component.split_whitespace().collect();
    let [deg, min, sec, ..] = tokens[..] else {
        return Err(CoordError::MissingComponent {
            axis,
            input: component.to_string(),
        });
    };
    let degrees = extract_number(deg)?;
    let minutes = extract_number(min)?;
    let seconds = extract_number(sec)?;
    Ok(hemisphere_sign(deg) * (degrees + (minutes * 60.0 + seconds) / 3600.0))
}

/// Parse a modern `WorldPosition` value into (latitude, longitude)
///
/// The trailing altitude component, if any, is ignored.
pub fn parse_world_position(position: &str) -> Result<(f64, f64), CoordError> {
    let mut parts = position.split(',');
    let lat = parts.next().unwrap_or_default();
    let Some(lon) = parts.next() else {
        return Err(CoordError::MissingComponent {
            axis: "longitude",
            input: position.to_string(),
        });
    };
    Ok((
        dms_to_decimal(lat, "latitude")?,
        dms_to_decimal(lon, "longitude")?,
    ))
}

/// Convert one legacy `<h><deg>* <min>'` component to signed decimal degrees
pub fn legacy_to_decimal(component: &str, axis: &'static str) -> Result<f64, CoordError> {
    let tokens: Vec<&str> = component.split_whitespace().collect();
    let [deg, min, ..] = tokens[..] else {
        return Err(CoordError::MissingComponent {
            axis,
            input: component.to_string(),
        });
    };
    let degrees = extract_number(deg)?;
    let minutes = extract_number(min)?;
    Ok(hemisphere_sign(deg) * (degrees + minutes / 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::round_wire;

    #[test]
    fn test_world_position() {
        let (lat, lon) =
            parse_world_position("N41° 48' 46.70\",E12° 16' 31.10\",+000014.00").unwrap();
        assert_eq!(round_wire(lat), 41.81297);
        assert_eq!(round_wire(lon), 12.27531);
    }

    #[test]
    fn test_world_position_southern_western() {
        let (lat, lon) = parse_world_position("S33° 56' 47.00\",W118° 24' 29.00\"").unwrap();
        assert!(lat < 0.0);
        assert!(lon < 0.0);
        assert_eq!(round_wire(lat), -33.94639);
        assert_eq!(round_wire(lon), -118.40806);
    }

    #[test]
    fn test_legacy_components() {
        let lat = legacy_to_decimal("N51* 40.19'", "latitude").unwrap();
        let lon = legacy_to_decimal("W0* 41.92'", "longitude").unwrap();
        assert_eq!(round_wire(lat), 51.66983);
        assert_eq!(round_wire(lon), -0.69867);
    }

    #[test]
    fn test_missing_longitude() {
        let err = parse_world_position("N41° 48' 46.70\"").unwrap_err();
        assert!(matches!(err, CoordError::MissingComponent { axis: "longitude", .. }));
    }

    #[test]
    fn test_missing_seconds() {
        assert!(dms_to_decimal("N41° 48'", "latitude").is_err());
    }

    #[test]
    fn test_garbage_number() {
        assert_eq!(
            legacy_to_decimal("N* x'", "latitude"),
            Err(CoordError::BadNumber("N*".to_string()))
        );
    }
}
