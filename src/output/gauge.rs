//! `FG_GD` instrument feed for the gauge client.

use super::{Column, Formatter, render};
use crate::telemetry::{TelemetryField as F, TelemetrySnapshot};

pub const PREFIX: &str = "FG_GD:";

const COLUMNS: [Column; 36] = [
    Column::Value(F::AirspeedBarberPole),
    Column::Value(F::AirspeedIndicated),
    Column::Value(F::AltitudeIndicated),
    Column::Value(F::HeadingGyro),
    Column::Value(F::AutopilotHeading),
    Column::Value(F::VerticalSpeed),
    Column::Value(F::DeltaHeadingRate),
    Column::Value(F::TurnCoordinatorBall),
    Column::Value(F::AttitudeBank),
    Column::Value(F::AttitudePitch),
    Column::Value(F::FuelLeftCapacity),
    Column::Value(F::FuelLeftQuantity),
    Column::Value(F::FuelRightCapacity),
    Column::Value(F::FuelRightQuantity),
    Column::Value(F::EngineCount),
    Column::Value(F::Prop1Rpm),
    Column::Value(F::Prop2Rpm),
    Column::Value(F::Eng1OilTemperature),
    Column::Value(F::Eng2OilTemperature),
    Column::Value(F::Eng1OilPressure),
    Column::Value(F::Eng2OilPressure),
    Column::Value(F::Eng1ManifoldPressure),
    Column::Value(F::Eng2ManifoldPressure),
    Column::Value(F::Eng1FuelFlow),
    Column::Value(F::Eng2FuelFlow),
    Column::Value(F::SuctionPressure),
    Column::Value(F::ElectricalLoad),
    Column::Value(F::LocalTime),
    Column::Value(F::AmbientTemperature),
    Column::Value(F::AdfRadial),
    Column::Value(F::AdfCard),
    Column::Value(F::Nav1Obs),
    Column::Value(F::Nav1ToFrom),
    Column::Value(F::Nav1HasGlideSlope),
    Column::Value(F::Nav1Cdi),
    Column::Value(F::Nav1Gsi),
];

pub struct GaugeFormatter;

impl Formatter for GaugeFormatter {
    fn format(&self, snapshot: &TelemetrySnapshot) -> String {
        render(PREFIX, &COLUMNS, snapshot)
    }
}
