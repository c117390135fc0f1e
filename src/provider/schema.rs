//! The user-aircraft data definition registered with the provider.
//!
//! Each entry names a provider variable, its unit and marshalled type, and
//! the snapshot field it lands in. Samples arrive as values in table order.

use std::collections::HashSet;

use crate::error::{RelayError, Result};
use crate::telemetry::TelemetryField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float64,
    /// Fixed 32-byte string
    String32,
}

/// Destination of a schema entry in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTarget {
    Numeric(TelemetryField),
    WaypointName,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub datatype: DataType,
    pub target: SchemaTarget,
}

#[derive(Debug, Clone, Copy)]
pub struct SampleSchema {
    fields: &'static [FieldSpec],
}

impl SampleSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the table covers every snapshot field exactly once with a
    /// matching type
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in self.fields {
            let expected = match spec.target {
                SchemaTarget::Numeric(_) => DataType::Float64,
                SchemaTarget::WaypointName => DataType::String32,
            };
            if spec.datatype != expected {
                return Err(RelayError::Schema(format!(
                    "{} is {:?}, expected {:?}",
                    spec.name, spec.datatype, expected
                )));
            }
            if !seen.insert(spec.target) {
                return Err(RelayError::Schema(format!(
                    "{:?} mapped more than once (at {})",
                    spec.target, spec.name
                )));
            }
        }

        let missing: Vec<_> = TelemetryField::ALL
            .iter()
            .filter(|f| !seen.contains(&SchemaTarget::Numeric(**f)))
            .collect();
        if !missing.is_empty() {
            return Err(RelayError::Schema(format!("unmapped fields: {:?}", missing)));
        }
        if !seen.contains(&SchemaTarget::WaypointName) {
            return Err(RelayError::Schema("waypoint name unmapped".to_string()));
        }
        Ok(())
    }
}

const fn num(name: &'static str, unit: &'static str, field: TelemetryField) -> FieldSpec {
    FieldSpec {
        name,
        unit: Some(unit),
        datatype: DataType::Float64,
        target: SchemaTarget::Numeric(field),
    }
}

use TelemetryField as F;

static SAMPLE_FIELDS: [FieldSpec; TelemetryField::COUNT + 1] = [
    num("PLANE LATITUDE", "degrees", F::Latitude),
    num("PLANE LONGITUDE", "degrees", F::Longitude),
    num("AIRSPEED BARBER POLE", "knots", F::AirspeedBarberPole),
    num("AIRSPEED INDICATED", "knots", F::AirspeedIndicated),
    num("GROUND VELOCITY", "knots", F::GroundVelocity),
    num("INDICATED ALTITUDE", "feet", F::AltitudeIndicated),
    num("PLANE HEADING DEGREES TRUE", "radians", F::GroundTrack),
    num("PLANE HEADING DEGREES MAGNETIC", "radians", F::HeadingMagnetic),
    num("FUEL LEFT CAPACITY", "gallons", F::FuelLeftCapacity),
    num("FUEL LEFT QUANTITY", "gallons", F::FuelLeftQuantity),
    num("FUEL RIGHT CAPACITY", "gallons", F::FuelRightCapacity),
    num("FUEL RIGHT QUANTITY", "gallons", F::FuelRightQuantity),
    num("VERTICAL SPEED", "feet per second", F::VerticalSpeed),
    num("GPS IS ACTIVE FLIGHT PLAN", "bool", F::GpsFlightPlanActive),
    num("GPS ETE", "seconds", F::GpsFlightPlanEte),
    num("GPS WP NEXT LAT", "degrees", F::WaypointLatitude),
    num("GPS WP NEXT LON", "degrees", F::WaypointLongitude),
    num("GPS WP DISTANCE", "meters", F::WaypointDistance),
    num("GPS WP NEXT ALT", "meters", F::WaypointAltitude),
    num("GPS COURSE TO STEER", "radians", F::WaypointCourse),
    num("GPS WP ETE", "seconds", F::WaypointEte),
    num("GPS WP DESIRED TRACK", "radians", F::WaypointDesiredTrack),
    num("GPS MAGVAR", "radians", F::MagneticVariation),
    num("WISKEY COMPASS INDICATION DEGREES", "radians", F::HeadingIndicatorMagnetic),
    FieldSpec {
        name: "GPS WP NEXT ID",
        unit: None,
        datatype: DataType::String32,
        target: SchemaTarget::WaypointName,
    },
    num("TURN COORDINATOR BALL", "position 128", F::TurnCoordinatorBall),
    num("DELTA HEADING RATE", "radians per second", F::DeltaHeadingRate),
    num("ATTITUDE INDICATOR BANK DEGREES", "radians", F::AttitudeBank),
    num("ATTITUDE INDICATOR PITCH DEGREES", "radians", F::AttitudePitch),
    num("PLANE HEADING DEGREES GYRO", "radians", F::HeadingGyro),
    num("NUMBER OF ENGINES", "number", F::EngineCount),
    num("PROP RPM:1", "rpm", F::Prop1Rpm),
    num("PROP RPM:2", "rpm", F::Prop2Rpm),
    num("GENERAL ENG OIL TEMPERATURE:1", "rankine", F::Eng1OilTemperature),
    num("GENERAL ENG OIL TEMPERATURE:2", "rankine", F::Eng2OilTemperature),
    num("GENERAL ENG OIL PRESSURE:1", "psi", F::Eng1OilPressure),
    num("GENERAL ENG OIL PRESSURE:2", "psi", F::Eng2OilPressure),
    num("ENG MANIFOLD PRESSURE:1", "inHg", F::Eng1ManifoldPressure),
    num("ENG MANIFOLD PRESSURE:2", "inHg", F::Eng2ManifoldPressure),
    num("ENG FUEL FLOW GPH:1", "gallons per hour", F::Eng1FuelFlow),
    num("ENG FUEL FLOW GPH:2", "gallons per hour", F::Eng2FuelFlow),
    num("SUCTION PRESSURE", "inHg", F::SuctionPressure),
    num("ELECTRICAL BATTERY LOAD", "amperes", F::ElectricalLoad),
    num("AUTOPILOT HEADING LOCK DIR", "degrees", F::AutopilotHeading),
    num("LOCAL TIME", "seconds", F::LocalTime),
    num("AMBIENT TEMPERATURE", "celsius", F::AmbientTemperature),
    num("ADF RADIAL:1", "radians", F::AdfRadial),
    num("ADF CARD", "degrees", F::AdfCard),
    num("NAV OBS:1", "radians", F::Nav1Obs),
    num("NAV TOFROM:1", "enum", F::Nav1ToFrom),
    num("NAV HAS GLIDE SLOPE:1", "bool", F::Nav1HasGlideSlope),
    num("HSI CDI NEEDLE", "number", F::Nav1Cdi),
    num("HSI GSI NEEDLE", "number", F::Nav1Gsi),
];

pub static SAMPLE_SCHEMA: SampleSchema = SampleSchema::new(&SAMPLE_FIELDS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schema_is_valid() {
        SAMPLE_SCHEMA.validate().unwrap();
        assert_eq!(SAMPLE_SCHEMA.len(), TelemetryField::COUNT + 1);
    }

    #[test]
    fn test_duplicate_target_rejected() {
        static DUPLICATED: [FieldSpec; 2] = [
            num("PLANE LATITUDE", "degrees", F::Latitude),
            num("GPS WP NEXT LAT", "degrees", F::Latitude),
        ];
        let schema = SampleSchema::new(&DUPLICATED);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let schema = SampleSchema::new(&SAMPLE_SCHEMA.fields()[1..]);
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("Latitude"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        static WRONG: [FieldSpec; 1] = [FieldSpec {
            name: "GPS WP NEXT ID",
            unit: None,
            datatype: DataType::Float64,
            target: SchemaTarget::WaypointName,
        }];
        assert!(SampleSchema::new(&WRONG).validate().is_err());
    }
}
