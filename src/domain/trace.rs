// Trace geometry domain models
use super::geo::LatLon;
use std::path::PathBuf;

pub const DEFAULT_WAYPOINT_LABEL: &str = "Waypoint";

/// Raw content of one trace file, before it is flattened into geometries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceDocument {
    pub tracks: Vec<TrackData>,
    pub routes: Vec<Vec<LatLon>>,
    pub waypoints: Vec<WaypointData>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackData {
    pub segments: Vec<Vec<LatLon>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaypointData {
    pub position: LatLon,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceGeometry {
    TrackSegment { points: Vec<LatLon> },
    Route { points: Vec<LatLon> },
    Waypoint { position: LatLon, label: String },
}

impl TraceGeometry {
    /// Flatten a parsed document: one segment per non-empty track segment,
    /// one route per non-empty route, one waypoint per waypoint.
    pub fn from_document(document: TraceDocument) -> Vec<TraceGeometry> {
        let segments = document
            .tracks
            .into_iter()
            .flat_map(|track| track.segments)
            .filter(|points| !points.is_empty())
            .map(|points| TraceGeometry::TrackSegment { points });

        let routes = document
            .routes
            .into_iter()
            .filter(|points| !points.is_empty())
            .map(|points| TraceGeometry::Route { points });

        let waypoints = document.waypoints.into_iter().map(|wp| {
            let label = wp
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_WAYPOINT_LABEL.to_string());
            TraceGeometry::Waypoint {
                position: wp.position,
                label,
            }
        });

        segments.chain(routes).chain(waypoints).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Missing,
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTrace {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything gathered from the trace files of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceCollection {
    pub geometries: Vec<TraceGeometry>,
    pub skipped: Vec<SkippedTrace>,
}

impl TraceCollection {
    pub fn failure_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn track_segments(&self) -> impl Iterator<Item = &Vec<LatLon>> {
        self.geometries.iter().filter_map(|g| match g {
            TraceGeometry::TrackSegment { points } => Some(points),
            _ => None,
        })
    }

    pub fn waypoint_count(&self) -> usize {
        self.geometries
            .iter()
            .filter(|g| matches!(g, TraceGeometry::Waypoint { .. }))
            .count()
    }
}
