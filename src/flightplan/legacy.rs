use crate::constants::LEGACY_WAYPOINT_MARKER;

use super::coords::legacy_to_decimal;
use super::{FlightPlan, Waypoint};

const ID_FIELD: usize = 3;
const TYPE_FIELD: usize = 4;
const LAT_FIELD: usize = 5;
const LON_FIELD: usize = 6;

fn parse_line(line: &str) -> Result<Waypoint, String> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() <= LON_FIELD {
        return Err(format!("{} fields, need {}", parts.len(), LON_FIELD + 1));
    }
    let lat = legacy_to_decimal(parts[LAT_FIELD].trim(), "latitude").map_err(|e| e.to_string())?;
    let lon = legacy_to_decimal(parts[LON_FIELD].trim(), "longitude").map_err(|e| e.to_string())?;
    Ok(Waypoint::new(
        parts[ID_FIELD].trim(),
        parts[TYPE_FIELD].trim(),
        lat,
        lon,
    ))
}

/// Append every waypoint line of a line-based plan to `plan`
///
/// Waypoints land in `plan` as they are parsed. The first bad line stops the
/// pass and the waypoints before it stay in place.
pub(super) fn parse_into(text: &str, plan: &mut FlightPlan) -> Result<(), String> {
    for (number, line) in text.lines().enumerate() {
        if !line.contains(LEGACY_WAYPOINT_MARKER) {
            continue;
        }
        let waypoint = parse_line(line).map_err(|e| format!("line {}: {}", number + 1, e))?;
        log::debug!(
            "Legacy waypoint {} ({}) at {}, {}",
            waypoint.id,
            waypoint.kind,
            waypoint.latitude,
            waypoint.longitude
        );
        plan.push(waypoint);
    }
    Ok(())
}
