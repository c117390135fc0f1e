use crate::constants::WIRE_DECIMALS;
use crate::error::{RelayError, Result};
use crate::provider::{RawSample, RawValue, SampleSchema, SchemaTarget};

use super::{TelemetryField, TelemetrySnapshot};

/// Round to wire precision, half away from zero
///
/// Negative zero collapses to zero so it never prints as `-0`. Values too
/// large to scale carry no fractional digits and pass through unchanged.
pub fn round_wire(value: f64) -> f64 {
    let scale = 10f64.powi(WIRE_DECIMALS);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Convert one raw provider sample into a snapshot
///
/// Values are matched to snapshot fields through `schema`, in the order the
/// schema was registered with the provider. A blank waypoint name keeps the
/// name from `previous`. Nothing is published unless every value in the
/// sample is well formed.
pub fn normalize(
    schema: &SampleSchema,
    sample: &RawSample,
    previous: Option<&TelemetrySnapshot>,
) -> Result<TelemetrySnapshot> {
    if sample.values.len() != schema.len() {
        return Err(RelayError::Sample(format!(
            "expected {} values, got {}",
            schema.len(),
            sample.values.len()
        )));
    }

    let mut values = [0.0; TelemetryField::COUNT];
    let mut waypoint_name = None;

    for (spec, value) in schema.fields().iter().zip(&sample.values) {
        match (spec.target, value) {
            (SchemaTarget::Numeric(field), RawValue::Float(v)) => {
                if !v.is_finite() {
                    return Err(RelayError::Sample(format!("{} is {}", spec.name, v)));
                }
                values[field.index()] = if field.is_rounded() { round_wire(*v) } else { *v };
            }
            (SchemaTarget::WaypointName, RawValue::Text(name)) => {
                waypoint_name = Some(name.as_str());
            }
            (_, other) => {
                return Err(RelayError::Sample(format!(
                    "{} has unexpected value {:?}",
                    spec.name, other
                )));
            }
        }
    }

    let waypoint_name = match waypoint_name.map(str::trim_end) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => previous
            .map(|p| p.waypoint_name().to_string())
            .unwrap_or_default(),
    };

    Ok(TelemetrySnapshot::from_parts(values, waypoint_name, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SAMPLE_SCHEMA;

    #[test]
    fn test_round_wire_huge_values_stay_finite() {
        assert_eq!(round_wire(1e305), 1e305);
        assert_eq!(round_wire(f64::MAX), f64::MAX);
        assert_eq!(round_wire(-f64::MAX), -f64::MAX);
        assert_eq!(round_wire(1.234565e10), 12345650000.0);
    }

    #[test]
    fn test_huge_sample_value_published_finite() {
        let snapshot = normalize(&SAMPLE_SCHEMA, &sample_with("OST", 1e305), None).unwrap();
        assert!(snapshot.get(TelemetryField::Latitude).is_finite());
    }

    fn sample_with(name: &str, fill: f64) -> RawSample {
        let values = SAMPLE_SCHEMA
            .fields()
            .iter()
            .map(|spec| match spec.target {
                SchemaTarget::Numeric(_) => RawValue::Float(fill),
                SchemaTarget::WaypointName => RawValue::Text(name.to_string()),
            })
            .collect();
        RawSample { values }
    }

    #[test]
    fn test_round_wire() {
        assert_eq!(round_wire(41.812972222), 41.81297);
        assert_eq!(round_wire(-0.698666666), -0.69867);
        assert_eq!(round_wire(12.275305555), 12.27531);
        assert_eq!(round_wire(-0.000001).to_string(), "0");
    }

    #[test]
    fn test_every_field_rounded_except_clock() {
        let snapshot = normalize(&SAMPLE_SCHEMA, &sample_with("ROM", 1.234567891), None).unwrap();
        for field in TelemetryField::ALL {
            let expected = if field == TelemetryField::LocalTime {
                1.234567891
            } else {
                1.23457
            };
            assert_eq!(snapshot.get(field), expected, "{:?}", field);
        }
        assert!(snapshot.provider_connected());
    }

    #[test]
    fn test_blank_waypoint_name_is_sticky() {
        let first = normalize(&SAMPLE_SCHEMA, &sample_with("ROM", 1.0), None).unwrap();
        let second = normalize(&SAMPLE_SCHEMA, &sample_with("   ", 2.0), Some(&first)).unwrap();
        assert_eq!(second.waypoint_name(), "ROM");
        assert_eq!(second.get(TelemetryField::Latitude), 2.0);

        let third = normalize(&SAMPLE_SCHEMA, &sample_with("OST", 3.0), Some(&second)).unwrap();
        assert_eq!(third.waypoint_name(), "OST");
    }

    #[test]
    fn test_blank_name_without_history_is_empty() {
        let snapshot = normalize(&SAMPLE_SCHEMA, &sample_with("", 1.0), None).unwrap();
        assert_eq!(snapshot.waypoint_name(), "");
    }

    #[test]
    fn test_short_sample_rejected() {
        let mut sample = sample_with("ROM", 1.0);
        sample.values.pop();
        assert!(normalize(&SAMPLE_SCHEMA, &sample, None).is_err());
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut sample = sample_with("ROM", 1.0);
        sample.values[0] = RawValue::Float(f64::NAN);
        assert!(normalize(&SAMPLE_SCHEMA, &sample, None).is_err());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut sample = sample_with("ROM", 1.0);
        sample.values[0] = RawValue::Text("41.8".to_string());
        assert!(normalize(&SAMPLE_SCHEMA, &sample, None).is_err());
    }
}
