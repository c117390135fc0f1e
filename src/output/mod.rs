mod gauge;
mod gps;
mod lists;
mod probe;

use chrono::Utc;

use crate::protocol::ClientFeed;
use crate::telemetry::{TelemetryField, TelemetrySnapshot};

pub use self::gauge::GaugeFormatter;
pub use self::gps::GpsFormatter;
pub use self::lists::{active_flight_plan, facility_list};
pub use self::probe::{OutputFormat, ReceivedDatagram, format_received};

/// Renders a snapshot as one push message
pub trait Formatter: Send + Sync {
    fn format(&self, snapshot: &TelemetrySnapshot) -> String;
}

/// Formatter for the feed a client registered for
///
/// Lite-map clients have no periodic feed of their own.
pub fn create_formatter(feed: ClientFeed) -> Option<Box<dyn Formatter>> {
    match feed {
        ClientFeed::Map => Some(Box::new(GpsFormatter)),
        ClientFeed::Gauge => Some(Box::new(GaugeFormatter)),
        ClientFeed::LiteMap => None,
    }
}

/// One colon-separated column of a push message
#[derive(Debug, Clone, Copy)]
pub(crate) enum Column {
    Value(TelemetryField),
    WaypointName,
}

pub(crate) fn render(prefix: &str, columns: &[Column], snapshot: &TelemetrySnapshot) -> String {
    let mut message = String::from(prefix);
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            message.push(':');
        }
        match column {
            Column::Value(field) => message.push_str(&wire_number(snapshot.get(*field))),
            Column::WaypointName => message.push_str(snapshot.waypoint_name()),
        }
    }
    message
}

/// Shortest decimal form that reads back to the same value
///
/// Never uses exponent notation; `-0` prints as `0`.
pub fn wire_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
