//! Seeded random-walk flight producing schema-ordered samples.

use std::f64::consts::PI;

use rand::RngExt;
use rand_chacha::ChaCha8Rng;

use crate::provider::{RawSample, RawValue, SampleSchema, SchemaTarget};
use crate::telemetry::TelemetryField;

const FEET_PER_METER: f64 = 3.28084;
const NM_PER_DEGREE: f64 = 60.0;

fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Route flown by the simulated aircraft, as (id, latitude, longitude)
const ROUTE: [(&str, f64, f64); 4] = [
    ("OST", 41.80417, 12.23611),
    ("TAQ", 42.21611, 11.73333),
    ("ELB", 42.72611, 10.39722),
    ("LIRP", 43.68389, 10.39278),
];

pub struct FlightModel {
    rng: ChaCha8Rng,
    latitude: f64,
    longitude: f64,
    heading_deg: f64,
    turn_rate_deg_s: f64,
    altitude_ft: f64,
    vertical_speed_fps: f64,
    airspeed_kt: f64,
    fuel_left: f64,
    fuel_right: f64,
    local_time_s: f64,
    next_waypoint: usize,
    /// Probability that a sample carries a blank waypoint name
    blank_name_rate: f64,
}

impl FlightModel {
    pub fn new(rng: ChaCha8Rng, latitude: f64, longitude: f64, blank_name_rate: f64) -> Self {
        Self {
            rng,
            latitude,
            longitude,
            heading_deg: 315.0,
            turn_rate_deg_s: 0.0,
            altitude_ft: 4500.0,
            vertical_speed_fps: 0.0,
            airspeed_kt: 120.0,
            fuel_left: 26.0,
            fuel_right: 26.0,
            local_time_s: 12.0 * 3600.0,
            next_waypoint: 0,
            blank_name_rate,
        }
    }

    /// Advance the aircraft by `dt` seconds
    pub fn step(&mut self, dt: f64) {
        let jitter = self.rng.random::<f64>() - 0.5;
        self.turn_rate_deg_s = (self.turn_rate_deg_s + jitter * 0.5).clamp(-3.0, 3.0);
        self.heading_deg = (self.heading_deg + self.turn_rate_deg_s * dt).rem_euclid(360.0);

        let jitter = self.rng.random::<f64>() - 0.5;
        self.vertical_speed_fps = (self.vertical_speed_fps + jitter).clamp(-15.0, 15.0);
        self.altitude_ft = (self.altitude_ft + self.vertical_speed_fps * dt).max(500.0);

        let jitter = self.rng.random::<f64>() - 0.5;
        self.airspeed_kt = (self.airspeed_kt + jitter).clamp(90.0, 160.0);

        let distance_nm = self.ground_speed() * dt / 3600.0;
        let heading = deg_to_rad(self.heading_deg);
        self.latitude += distance_nm / NM_PER_DEGREE * heading.cos();
        self.longitude +=
            distance_nm / NM_PER_DEGREE * heading.sin() / deg_to_rad(self.latitude).cos();

        let burn = self.fuel_flow() / 3600.0 * dt / 2.0;
        self.fuel_left = (self.fuel_left - burn).max(0.0);
        self.fuel_right = (self.fuel_right - burn).max(0.0);
        self.local_time_s = (self.local_time_s + dt).rem_euclid(86400.0);

        let (_, lat, lon) = ROUTE[self.next_waypoint];
        if self.distance_nm_to(lat, lon) < 2.0 {
            self.next_waypoint = (self.next_waypoint + 1) % ROUTE.len();
        }
    }

    fn ground_speed(&self) -> f64 {
        self.airspeed_kt * (1.0 + self.altitude_ft / 1000.0 * 0.02)
    }

    fn fuel_flow(&self) -> f64 {
        8.0 + self.airspeed_kt / 40.0
    }

    fn distance_nm_to(&self, lat: f64, lon: f64) -> f64 {
        let dlat = (lat - self.latitude) * NM_PER_DEGREE;
        let dlon = (lon - self.longitude) * NM_PER_DEGREE * deg_to_rad(self.latitude).cos();
        dlat.hypot(dlon)
    }

    fn course_to(&self, lat: f64, lon: f64) -> f64 {
        let dlat = lat - self.latitude;
        let dlon = (lon - self.longitude) * deg_to_rad(self.latitude).cos();
        dlon.atan2(dlat).rem_euclid(2.0 * PI)
    }

    fn value(&self, field: TelemetryField) -> f64 {
        use TelemetryField as F;

        let (_, wp_lat, wp_lon) = ROUTE[self.next_waypoint];
        let heading = deg_to_rad(self.heading_deg);
        let ete = self.distance_nm_to(wp_lat, wp_lon) / self.ground_speed().max(1.0) * 3600.0;
        let rpm = 2300.0 + self.airspeed_kt * 2.0;

        match field {
            F::Latitude => self.latitude,
            F::Longitude => self.longitude,
            F::AirspeedBarberPole => 163.0,
            F::AirspeedIndicated => self.airspeed_kt,
            F::GroundVelocity => self.ground_speed(),
            F::AltitudeIndicated => self.altitude_ft,
            F::GroundTrack => heading,
            F::HeadingMagnetic => heading - deg_to_rad(2.0),
            F::FuelLeftCapacity | F::FuelRightCapacity => 26.0,
            F::FuelLeftQuantity => self.fuel_left,
            F::FuelRightQuantity => self.fuel_right,
            F::VerticalSpeed => self.vertical_speed_fps,
            F::GpsFlightPlanActive => 1.0,
            F::GpsFlightPlanEte => ete * (ROUTE.len() - self.next_waypoint) as f64,
            F::WaypointLatitude => wp_lat,
            F::WaypointLongitude => wp_lon,
            F::WaypointDistance => self.distance_nm_to(wp_lat, wp_lon) * 1852.0,
            F::WaypointAltitude => 4500.0 / FEET_PER_METER,
            F::WaypointCourse | F::WaypointDesiredTrack => self.course_to(wp_lat, wp_lon),
            F::WaypointEte => ete,
            F::MagneticVariation => deg_to_rad(2.0),
            F::HeadingIndicatorMagnetic => heading - deg_to_rad(2.0),
            F::TurnCoordinatorBall => -self.turn_rate_deg_s * 4.0,
            F::DeltaHeadingRate => deg_to_rad(self.turn_rate_deg_s),
            F::AttitudeBank => -deg_to_rad(self.turn_rate_deg_s * 5.0),
            F::AttitudePitch => -deg_to_rad(self.vertical_speed_fps / 3.0),
            F::HeadingGyro => heading,
            F::EngineCount => 2.0,
            F::Prop1Rpm => rpm,
            F::Prop2Rpm => rpm + 5.0,
            F::Eng1OilTemperature | F::Eng2OilTemperature => 640.0,
            F::Eng1OilPressure | F::Eng2OilPressure => 62.0,
            F::Eng1ManifoldPressure | F::Eng2ManifoldPressure => 23.5,
            F::Eng1FuelFlow | F::Eng2FuelFlow => self.fuel_flow() / 2.0,
            F::SuctionPressure => 5.0,
            F::ElectricalLoad => 12.0,
            F::AutopilotHeading => self.heading_deg.round(),
            F::LocalTime => self.local_time_s,
            F::AmbientTemperature => 15.0 - self.altitude_ft / 1000.0 * 2.0,
            F::AdfRadial => self.course_to(wp_lat, wp_lon),
            F::AdfCard => 0.0,
            F::Nav1Obs => self.course_to(wp_lat, wp_lon),
            F::Nav1ToFrom => 1.0,
            F::Nav1HasGlideSlope => 0.0,
            F::Nav1Cdi => (self.course_to(wp_lat, wp_lon) - heading).sin() * 127.0,
            F::Nav1Gsi => 0.0,
        }
    }

    /// Current state as a provider sample laid out by `schema`
    pub fn sample(&mut self, schema: &SampleSchema) -> RawSample {
        let blank = self.rng.random::<f64>() < self.blank_name_rate;
        let values = schema
            .fields()
            .iter()
            .map(|spec| match spec.target {
                SchemaTarget::Numeric(field) => RawValue::Float(self.value(field)),
                SchemaTarget::WaypointName if blank => RawValue::Text(String::new()),
                SchemaTarget::WaypointName => {
                    RawValue::Text(ROUTE[self.next_waypoint].0.to_string())
                }
            })
            .collect();
        RawSample { values }
    }
}
