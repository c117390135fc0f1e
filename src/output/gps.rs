//! `FM_GPS` navigation feed for the primary map client.

use super::{Column, Formatter, render};
use crate::telemetry::{TelemetryField as F, TelemetrySnapshot};

pub const PREFIX: &str = "FM_GPS:";

const COLUMNS: [Column; 27] = [
    Column::Value(F::Latitude),
    Column::Value(F::Longitude),
    Column::Value(F::AirspeedBarberPole),
    Column::Value(F::AirspeedIndicated),
    Column::Value(F::GroundVelocity),
    Column::Value(F::AltitudeIndicated),
    Column::Value(F::GroundTrack),
    Column::Value(F::HeadingMagnetic),
    Column::Value(F::FuelLeftCapacity),
    Column::Value(F::FuelLeftQuantity),
    Column::Value(F::FuelRightCapacity),
    Column::Value(F::FuelRightQuantity),
    Column::Value(F::VerticalSpeed),
    Column::Value(F::GpsFlightPlanActive),
    Column::Value(F::GpsFlightPlanEte),
    Column::Value(F::WaypointLatitude),
    Column::Value(F::WaypointLongitude),
    Column::Value(F::WaypointDistance),
    Column::Value(F::WaypointAltitude),
    Column::Value(F::WaypointCourse),
    Column::Value(F::WaypointEte),
    Column::Value(F::WaypointDesiredTrack),
    Column::Value(F::MagneticVariation),
    Column::Value(F::HeadingIndicatorMagnetic),
    Column::WaypointName,
    Column::Value(F::HeadingGyro),
    Column::Value(F::AutopilotHeading),
];

pub struct GpsFormatter;

impl Formatter for GpsFormatter {
    fn format(&self, snapshot: &TelemetrySnapshot) -> String {
        render(PREFIX, &COLUMNS, snapshot)
    }
}
