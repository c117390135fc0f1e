//! On-demand list replies sent over the control channel.

use super::wire_number;
use crate::facility::{FacilityKind, FacilityRecord};
use crate::flightplan::FlightPlan;

fn list_header(kind: FacilityKind) -> (&'static str, &'static str) {
    match kind {
        FacilityKind::Airport => ("AIRPORTS", "NO_APTS_LOADED"),
        FacilityKind::Vor => ("VORS", "NO_VORS_LOADED"),
        FacilityKind::Ndb => ("NDBS", "NO_NDBS_LOADED"),
    }
}

fn record_group(record: &FacilityRecord) -> String {
    match record {
        FacilityRecord::Airport(a) => format!(
            "{};{};{}",
            a.icao,
            wire_number(a.latitude),
            wire_number(a.longitude)
        ),
        FacilityRecord::Vor(v) => format!(
            "{};{};{};{};{}",
            v.icao,
            v.frequency,
            wire_number(v.latitude),
            wire_number(v.longitude),
            if v.has_dme() { "True" } else { "False" }
        ),
        FacilityRecord::Ndb(n) => format!(
            "{};{};{};{}",
            n.icao,
            wire_number(n.frequency),
            wire_number(n.latitude),
            wire_number(n.longitude)
        ),
    }
}

/// `AIRPORTS`/`VORS`/`NDBS` followed by one group per record, oldest first,
/// or the kind's empty sentinel
///
/// Records of another kind are skipped.
pub fn facility_list(kind: FacilityKind, records: &[FacilityRecord]) -> String {
    let (header, empty) = list_header(kind);
    let mut message = String::from(header);
    let mut count = 0;
    for record in records.iter().filter(|r| r.kind() == kind) {
        message.push(':');
        message.push_str(&record_group(record));
        count += 1;
    }
    if count == 0 {
        return empty.to_string();
    }
    message
}

/// `ACTIVE_FP` followed by one `id;type;lat;lon` group per waypoint, or
/// `NO_FP_LOADED`
pub fn active_flight_plan(plan: &FlightPlan) -> String {
    if plan.is_empty() {
        return "NO_FP_LOADED".to_string();
    }
    let mut message = String::from("ACTIVE_FP");
    for waypoint in plan.waypoints() {
        message.push_str(&format!(
            ":{};{};{};{}",
            waypoint.id,
            waypoint.kind,
            wire_number(waypoint.latitude),
            wire_number(waypoint.longitude)
        ));
    }
    message
}
