// GPX adapter for the trace file primitive
use crate::application::repositories::TraceRepository;
use crate::domain::geo::LatLon;
use crate::domain::trace::{TraceDocument, TrackData, WaypointData};
use crate::error::TraceReadError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct GpxTraceRepository;

fn to_lat_lon(waypoint: &gpx::Waypoint) -> LatLon {
    let point = waypoint.point();
    LatLon::new(point.y(), point.x())
}

/// Parse a GPX document into tracks, routes and waypoints.
pub fn parse_gpx<R: Read>(reader: R) -> Result<TraceDocument, gpx::errors::GpxError> {
    let gpx = gpx::read(reader)?;

    let tracks = gpx
        .tracks
        .iter()
        .map(|track| TrackData {
            segments: track
                .segments
                .iter()
                .map(|segment| segment.points.iter().map(to_lat_lon).collect())
                .collect(),
        })
        .collect();

    let routes = gpx
        .routes
        .iter()
        .map(|route| route.points.iter().map(to_lat_lon).collect())
        .collect();

    let waypoints = gpx
        .waypoints
        .iter()
        .map(|wp| WaypointData {
            position: to_lat_lon(wp),
            name: wp.name.clone(),
        })
        .collect();

    Ok(TraceDocument {
        tracks,
        routes,
        waypoints,
    })
}

impl TraceRepository for GpxTraceRepository {
    fn load_trace(&self, path: &Path) -> Result<TraceDocument, TraceReadError> {
        let file = File::open(path).map_err(|e| TraceReadError::from_io(path.to_path_buf(), e))?;

        parse_gpx(BufReader::new(file)).map_err(|e| TraceReadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
