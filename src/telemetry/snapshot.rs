/// Numeric telemetry values carried by a snapshot
///
/// The discriminant doubles as the index into [`TelemetrySnapshot`]'s value
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum TelemetryField {
    Latitude,
    Longitude,
    AirspeedBarberPole,
    AirspeedIndicated,
    GroundVelocity,
    AltitudeIndicated,
    GroundTrack,
    HeadingMagnetic,
    FuelLeftCapacity,
    FuelLeftQuantity,
    FuelRightCapacity,
    FuelRightQuantity,
    VerticalSpeed,
    GpsFlightPlanActive,
    GpsFlightPlanEte,
    WaypointLatitude,
    WaypointLongitude,
    WaypointDistance,
    WaypointAltitude,
    WaypointCourse,
    WaypointEte,
    WaypointDesiredTrack,
    MagneticVariation,
    HeadingIndicatorMagnetic,
    TurnCoordinatorBall,
    DeltaHeadingRate,
    AttitudeBank,
    AttitudePitch,
    HeadingGyro,
    EngineCount,
    Prop1Rpm,
    Prop2Rpm,
    Eng1OilTemperature,
    Eng2OilTemperature,
    Eng1OilPressure,
    Eng2OilPressure,
    Eng1ManifoldPressure,
    Eng2ManifoldPressure,
    Eng1FuelFlow,
    Eng2FuelFlow,
    SuctionPressure,
    ElectricalLoad,
    AutopilotHeading,
    LocalTime,
    AmbientTemperature,
    AdfRadial,
    AdfCard,
    Nav1Obs,
    Nav1ToFrom,
    Nav1HasGlideSlope,
    Nav1Cdi,
    Nav1Gsi,
}

impl TelemetryField {
    pub const COUNT: usize = 52;

    pub const ALL: [TelemetryField; Self::COUNT] = [
        Self::Latitude,
        Self::Longitude,
        Self::AirspeedBarberPole,
        Self::AirspeedIndicated,
        Self::GroundVelocity,
        Self::AltitudeIndicated,
        Self::GroundTrack,
        Self::HeadingMagnetic,
        Self::FuelLeftCapacity,
        Self::FuelLeftQuantity,
        Self::FuelRightCapacity,
        Self::FuelRightQuantity,
        Self::VerticalSpeed,
        Self::GpsFlightPlanActive,
        Self::GpsFlightPlanEte,
        Self::WaypointLatitude,
        Self::WaypointLongitude,
        Self::WaypointDistance,
        Self::WaypointAltitude,
        Self::WaypointCourse,
        Self::WaypointEte,
        Self::WaypointDesiredTrack,
        Self::MagneticVariation,
        Self::HeadingIndicatorMagnetic,
        Self::TurnCoordinatorBall,
        Self::DeltaHeadingRate,
        Self::AttitudeBank,
        Self::AttitudePitch,
        Self::HeadingGyro,
        Self::EngineCount,
        Self::Prop1Rpm,
        Self::Prop2Rpm,
        Self::Eng1OilTemperature,
        Self::Eng2OilTemperature,
        Self::Eng1OilPressure,
        Self::Eng2OilPressure,
        Self::Eng1ManifoldPressure,
        Self::Eng2ManifoldPressure,
        Self::Eng1FuelFlow,
        Self::Eng2FuelFlow,
        Self::SuctionPressure,
        Self::ElectricalLoad,
        Self::AutopilotHeading,
        Self::LocalTime,
        Self::AmbientTemperature,
        Self::AdfRadial,
        Self::AdfCard,
        Self::Nav1Obs,
        Self::Nav1ToFrom,
        Self::Nav1HasGlideSlope,
        Self::Nav1Cdi,
        Self::Nav1Gsi,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the value is cut to wire precision during normalization
    ///
    /// The simulator clock is passed through untouched; clients have
    /// always received it at full precision.
    pub fn is_rounded(self) -> bool {
        self != Self::LocalTime
    }
}

/// One fully normalized telemetry sample
///
/// Built once per provider sample and published behind an `Arc`; never
/// mutated after publication.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    values: [f64; TelemetryField::COUNT],
    waypoint_name: String,
    provider_connected: bool,
}

impl TelemetrySnapshot {
    pub(crate) fn from_parts(
        values: [f64; TelemetryField::COUNT],
        waypoint_name: String,
        provider_connected: bool,
    ) -> Self {
        Self {
            values,
            waypoint_name,
            provider_connected,
        }
    }

    pub fn get(&self, field: TelemetryField) -> f64 {
        self.values[field.index()]
    }

    /// Identifier of the next GPS waypoint, possibly carried over from an
    /// earlier sample
    pub fn waypoint_name(&self) -> &str {
        &self.waypoint_name
    }

    pub fn provider_connected(&self) -> bool {
        self.provider_connected
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            values: [0.0; TelemetryField::COUNT],
            waypoint_name: String::new(),
            provider_connected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, field) in TelemetryField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "{:?} out of order", field);
        }
    }

    #[test]
    fn test_only_local_time_is_exempt_from_rounding() {
        let exempt: Vec<_> = TelemetryField::ALL
            .iter()
            .filter(|f| !f.is_rounded())
            .collect();
        assert_eq!(exempt, vec![&TelemetryField::LocalTime]);
    }
}
