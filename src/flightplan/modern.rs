use roxmltree::{Document, Node};

use super::coords::parse_world_position;
use super::{StageResult, Waypoint};

const WAYPOINT_TAG: &str = "ATCWaypoint";
const TYPE_TAG: &str = "ATCWaypointType";
const POSITION_TAG: &str = "WorldPosition";

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
}

/// Parse a tag-structured plan
///
/// All or nothing: the first malformed waypoint abandons the whole document.
pub(super) fn parse(text: &str) -> StageResult {
    let doc = match Document::parse(text) {
        Ok(doc) => doc,
        Err(e) => return StageResult::Retry(format!("not XML: {}", e)),
    };

    let mut waypoints = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name(WAYPOINT_TAG)) {
        let index = waypoints.len();
        let id = node
            .attribute("id")
            .or_else(|| node.attributes().next().map(|a| a.value()));
        let Some(id) = id else {
            return StageResult::Retry(format!("waypoint {} has no identifier", index));
        };
        let Some(kind) = child_text(node, TYPE_TAG) else {
            return StageResult::Retry(format!("waypoint {} has no {}", id, TYPE_TAG));
        };
        let Some(position) = child_text(node, POSITION_TAG) else {
            return StageResult::Retry(format!("waypoint {} has no {}", id, POSITION_TAG));
        };
        match parse_world_position(position) {
            Ok((lat, lon)) => waypoints.push(Waypoint::new(id, kind, lat, lon)),
            Err(e) => return StageResult::Retry(format!("waypoint {}: {}", id, e)),
        }
    }

    if waypoints.is_empty() {
        return StageResult::Retry(format!("no {} elements", WAYPOINT_TAG));
    }
    StageResult::Parsed(waypoints)
}
