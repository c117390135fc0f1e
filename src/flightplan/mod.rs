//! Flight plans loaded by the host, in either of its two file formats.
//!
//! Format detection is a trial parse: the tag-structured format is tried
//! first and, when it does not fit, the legacy line format. The pipeline is
//! explicit; each stage reports whether it produced waypoints or wants the
//! next stage to try.

pub mod coords;
mod legacy;
mod modern;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::RelayError;
use crate::telemetry::round_wire;

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: String,
    /// Type tag as written in the file (`Airport`, `VOR`, `A`, ...)
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    /// Coordinates are rounded to wire precision
    pub fn new(id: impl Into<String>, kind: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            latitude: round_wire(latitude),
            longitude: round_wire(longitude),
        }
    }
}

/// Ordered waypoints of the active plan; empty means no plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightPlan {
    waypoints: Vec<Waypoint>,
}

impl FlightPlan {
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    /// Tag-structured document with `ATCWaypoint` elements
    Modern,
    /// Line-based `waypoint.N=` entries
    Legacy,
}

impl fmt::Display for PlanFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanFormat::Modern => write!(f, "modern"),
            PlanFormat::Legacy => write!(f, "legacy"),
        }
    }
}

/// Result of one format stage
#[derive(Debug)]
pub enum StageResult {
    Parsed(Vec<Waypoint>),
    /// Input does not fit this format; carries the reason
    Retry(String),
}

#[derive(Debug)]
pub enum ParseOutcome {
    Loaded { format: PlanFormat, waypoints: usize },
    /// Both formats failed. `retained` waypoints from the legacy pass stay
    /// in the plan.
    Failed { retained: usize, error: RelayError },
}

impl ParseOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ParseOutcome::Loaded { .. })
    }
}

/// Clear `plan` and fill it from the file at `path`
pub fn load_file(path: &Path, plan: &mut FlightPlan) -> ParseOutcome {
    plan.clear();
    match fs::read(path) {
        Ok(bytes) => load_str(&String::from_utf8_lossy(&bytes), path, plan),
        Err(e) => ParseOutcome::Failed {
            retained: 0,
            error: RelayError::FlightPlanParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        },
    }
}

/// Clear `plan` and fill it from `text`; `path` is only used for reporting
pub fn load_str(text: &str, path: &Path, plan: &mut FlightPlan) -> ParseOutcome {
    plan.clear();

    let modern_reason = match modern::parse(text) {
        StageResult::Parsed(waypoints) => {
            let count = waypoints.len();
            plan.waypoints = waypoints;
            return ParseOutcome::Loaded {
                format: PlanFormat::Modern,
                waypoints: count,
            };
        }
        StageResult::Retry(reason) => reason,
    };
    log::debug!("{} is not a modern plan ({}), trying legacy", path.display(), modern_reason);

    let legacy_reason = match legacy::parse_into(text, plan) {
        Ok(()) if !plan.is_empty() => {
            return ParseOutcome::Loaded {
                format: PlanFormat::Legacy,
                waypoints: plan.len(),
            };
        }
        Ok(()) => "no waypoint lines".to_string(),
        Err(reason) => reason,
    };

    ParseOutcome::Failed {
        retained: plan.len(),
        error: RelayError::FlightPlanParse {
            path: path.to_path_buf(),
            reason: format!("modern: {}; legacy: {}", modern_reason, legacy_reason),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODERN: &str = r#"<SimBase.Document><FlightPlan.FlightPlan>
<ATCWaypoint id="LIRF"><ATCWaypointType>Airport</ATCWaypointType><WorldPosition>N41° 48' 46.70",E12° 16' 31.10",+000014.00</WorldPosition></ATCWaypoint>
<ATCWaypoint id="OST"><ATCWaypointType>VOR</ATCWaypointType><WorldPosition>N41° 48' 15.00",E12° 14' 10.00",+000000.00</WorldPosition></ATCWaypoint>
</FlightPlan.FlightPlan></SimBase.Document>"#;

    const LEGACY: &str = "[flightplan]\n\
        waypoint.0=EGLL, EGLL, , EGLL, A, N51* 28.65', W0* 27.68', +000080.00, \n\
        waypoint.1=EGKK, EGKK, , EGKK, A, N51* 8.88', W0* 11.42', +000202.00, \n";

    fn residual_plan() -> FlightPlan {
        let mut plan = FlightPlan::default();
        for id in ["OLD1", "OLD2", "OLD3"] {
            plan.push(Waypoint::new(id, "User", 1.0, 2.0));
        }
        plan
    }

    #[test]
    fn test_modern_plan() {
        let mut plan = residual_plan();
        let outcome = load_str(MODERN, Path::new("rome.pln"), &mut plan);
        assert!(matches!(
            outcome,
            ParseOutcome::Loaded { format: PlanFormat::Modern, waypoints: 2 }
        ));
        assert_eq!(plan.waypoints()[1].id, "OST");
    }

    #[test]
    fn test_legacy_fallback_starts_from_empty() {
        let mut plan = residual_plan();
        let outcome = load_str(LEGACY, Path::new("london.flt"), &mut plan);
        assert!(matches!(
            outcome,
            ParseOutcome::Loaded { format: PlanFormat::Legacy, waypoints: 2 }
        ));
        let ids: Vec<_> = plan.waypoints().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["EGLL", "EGKK"]);
    }

    #[test]
    fn test_both_formats_fail() {
        let mut plan = residual_plan();
        let outcome = load_str("nothing useful here", Path::new("junk.txt"), &mut plan);
        let ParseOutcome::Failed { retained, error } = outcome else {
            panic!("junk should not load");
        };
        assert_eq!(retained, 0);
        assert!(plan.is_empty());
        assert!(error.to_string().contains("junk.txt"));
    }

    #[test]
    fn test_legacy_failure_keeps_partial() {
        let broken = LEGACY.replace("N51* 8.88'", "?");
        let mut plan = FlightPlan::default();
        let outcome = load_str(&broken, Path::new("london.flt"), &mut plan);
        assert!(matches!(outcome, ParseOutcome::Failed { retained: 1, .. }));
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let mut plan = residual_plan();
        let outcome = load_file(Path::new("/nonexistent/plan.pln"), &mut plan);
        assert!(!outcome.is_loaded());
        assert!(plan.is_empty());
    }
}
