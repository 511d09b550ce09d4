// Map composer - Use case for building the expedition map end to end
use crate::application::popup_builder::build_popup;
use crate::application::repositories::{MapRenderer, TableRepository, TraceRepository};
use crate::application::schema_normalizer::normalize_sites;
use crate::application::trace_aggregator::TraceAggregator;
use crate::domain::geo::LatLon;
use crate::domain::map::{LineKind, MapArtifact, MapStyle, Marker, MarkerPopup, Viewport};
use crate::domain::site::SiteRecord;
use crate::domain::trace::{TraceCollection, TraceGeometry};
use crate::error::{MapError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Input and output files of one run.
#[derive(Debug, Clone)]
pub struct ExpeditionPlan {
    pub sites: PathBuf,
    pub traces: Vec<PathBuf>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub center: LatLon,
    pub line_layers: usize,
    pub marker_layers: usize,
    pub site_count: usize,
    pub skipped_traces: usize,
}

#[derive(Clone)]
pub struct MapComposer {
    tables: Arc<dyn TableRepository>,
    aggregator: TraceAggregator,
    renderer: Arc<dyn MapRenderer>,
    style: MapStyle,
}

impl MapComposer {
    pub fn new(
        tables: Arc<dyn TableRepository>,
        traces: Arc<dyn TraceRepository>,
        renderer: Arc<dyn MapRenderer>,
        style: MapStyle,
    ) -> Self {
        Self {
            tables,
            aggregator: TraceAggregator::new(traces),
            renderer,
            style,
        }
    }

    /// Run the whole pipeline and write the map exactly once.
    pub fn run(&self, plan: &ExpeditionPlan) -> Result<RunSummary> {
        let table = self.tables.read_table(&plan.sites)?;
        let sites = normalize_sites(&table)?;
        tracing::info!("Loaded {} sites from {}", sites.len(), plan.sites.display());

        let traces = self.aggregator.aggregate(&plan.traces);
        tracing::info!(
            "Loaded {} trace geometries from {} files ({} skipped)",
            traces.geometries.len(),
            plan.traces.len(),
            traces.failure_count()
        );

        let artifact = self.compose(&sites, &traces)?;
        let summary = RunSummary {
            center: artifact.viewport.center,
            line_layers: artifact.line_count(),
            marker_layers: artifact.marker_count(),
            site_count: sites.len(),
            skipped_traces: traces.failure_count(),
        };

        self.emit(artifact, &plan.output)?;
        Ok(summary)
    }

    /// Assemble the artifact in memory: trace layers first, then one marker per site.
    pub fn compose(&self, sites: &[SiteRecord], traces: &TraceCollection) -> Result<MapArtifact> {
        let center = LatLon::centroid(sites.iter().map(SiteRecord::position))
            .ok_or(MapError::NoSites)?;

        let mut artifact = MapArtifact::new(Viewport {
            center,
            zoom: self.style.zoom,
        });

        for geometry in &traces.geometries {
            self.draw_geometry(&mut artifact, geometry);
        }

        for site in sites {
            artifact.add_marker(Marker {
                position: site.position(),
                tooltip: Some(site.name.clone()),
                popup: MarkerPopup::Content(build_popup(site)),
                color: None,
            });
        }

        Ok(artifact)
    }

    /// Hand the finished artifact to the renderer. Consumes it so it can only
    /// be written once.
    pub fn emit(&self, artifact: MapArtifact, output: &Path) -> Result<()> {
        self.renderer.write_map(&artifact, output)?;
        tracing::info!("Map saved as {}", output.display());
        Ok(())
    }

    fn draw_geometry(&self, artifact: &mut MapArtifact, geometry: &TraceGeometry) {
        match geometry {
            TraceGeometry::TrackSegment { points } => {
                self.draw_line(artifact, LineKind::Track, points);
            }
            TraceGeometry::Route { points } => {
                self.draw_line(artifact, LineKind::Route, points);
            }
            TraceGeometry::Waypoint { position, label } => {
                artifact.add_marker(Marker {
                    position: *position,
                    tooltip: None,
                    popup: MarkerPopup::Text(label.clone()),
                    color: Some(self.style.waypoint_color.clone()),
                });
            }
        }
    }

    fn draw_line(&self, artifact: &mut MapArtifact, kind: LineKind, points: &[LatLon]) {
        if points.len() < 2 {
            tracing::debug!("Skipping {:?} with a single point", kind);
            return;
        }
        let style = match kind {
            LineKind::Track => &self.style.track,
            LineKind::Route => &self.style.route,
        };
        artifact.add_line(kind, points.to_vec(), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::Layer;
    use crate::domain::table::Table;
    use crate::domain::trace::{TraceDocument, TrackData, WaypointData};
    use crate::error::TraceReadError;
    use std::sync::Mutex;

    struct FakeTable(Table);

    impl TableRepository for FakeTable {
        fn read_table(&self, _path: &Path) -> Result<Table> {
            Ok(self.0.clone())
        }

        fn write_table(&self, _path: &Path, _table: &Table) -> Result<()> {
            Ok(())
        }
    }

    struct FakeTraces(TraceDocument);

    impl TraceRepository for FakeTraces {
        fn load_trace(&self, path: &Path) -> Result<TraceDocument, TraceReadError> {
            if path == Path::new("day1.gpx") {
                Ok(self.0.clone())
            } else {
                Err(TraceReadError::NotFound {
                    path: path.to_path_buf(),
                })
            }
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        written: Mutex<Vec<(PathBuf, MapArtifact)>>,
    }

    impl MapRenderer for RecordingRenderer {
        fn write_map(&self, artifact: &MapArtifact, path: &Path) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), artifact.clone()));
            Ok(())
        }
    }

    fn two_site_table() -> Table {
        Table::new(
            vec!["lat".to_string(), "lon".to_string()],
            vec![
                vec!["10".to_string(), "20".to_string()],
                vec!["30".to_string(), "40".to_string()],
            ],
        )
    }

    fn one_day_trace() -> TraceDocument {
        TraceDocument {
            tracks: vec![TrackData {
                segments: vec![vec![
                    LatLon::new(10.0, 20.0),
                    LatLon::new(11.0, 21.0),
                    LatLon::new(12.0, 22.0),
                ]],
            }],
            waypoints: vec![WaypointData {
                position: LatLon::new(15.0, 25.0),
                name: None,
            }],
            ..Default::default()
        }
    }

    fn composer(table: Table, renderer: Arc<RecordingRenderer>) -> MapComposer {
        MapComposer::new(
            Arc::new(FakeTable(table)),
            Arc::new(FakeTraces(one_day_trace())),
            renderer,
            MapStyle::default(),
        )
    }

    fn plan(traces: &[&str]) -> ExpeditionPlan {
        ExpeditionPlan {
            sites: PathBuf::from("sites.csv"),
            traces: traces.iter().map(PathBuf::from).collect(),
            output: PathBuf::from("map.html"),
        }
    }

    #[test]
    fn test_two_sites_without_traces() {
        let renderer = Arc::new(RecordingRenderer::default());
        let summary = composer(two_site_table(), renderer.clone())
            .run(&plan(&[]))
            .unwrap();

        assert_eq!(summary.center, LatLon::new(20.0, 30.0));
        assert_eq!(summary.marker_layers, 2);
        assert_eq!(summary.line_layers, 0);

        let written = renderer.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        for layer in written[0].1.layers() {
            match layer {
                Layer::Marker(Marker {
                    popup: MarkerPopup::Content(content),
                    tooltip,
                    ..
                }) => {
                    let labels: Vec<&str> =
                        content.blocks.iter().map(|b| b.label.as_str()).collect();
                    assert_eq!(labels, vec!["Lat", "Lon"]);
                    assert_eq!(tooltip.as_deref(), Some(content.title.as_str()));
                }
                other => panic!("unexpected layer: {:?}", other),
            }
        }
    }

    #[test]
    fn test_trace_layers_precede_site_markers() {
        let renderer = Arc::new(RecordingRenderer::default());
        let summary = composer(two_site_table(), renderer.clone())
            .run(&plan(&["day1.gpx", "missing.gpx"]))
            .unwrap();

        assert_eq!(summary.line_layers, 1);
        assert_eq!(summary.marker_layers, 3);
        assert_eq!(summary.skipped_traces, 1);

        let written = renderer.written.lock().unwrap();
        let layers = written[0].1.layers();
        match &layers[0] {
            Layer::Line { kind, points, style } => {
                assert_eq!(*kind, LineKind::Track);
                assert_eq!(points.len(), 3);
                assert_eq!(style.color, "blue");
            }
            other => panic!("expected a track line, got {:?}", other),
        }
        match &layers[1] {
            Layer::Marker(marker) => {
                assert_eq!(marker.popup, MarkerPopup::Text("Waypoint".to_string()));
                assert_eq!(marker.color.as_deref(), Some("red"));
            }
            other => panic!("expected a waypoint marker, got {:?}", other),
        }
    }

    #[test]
    fn test_runs_are_idempotent() {
        let renderer = Arc::new(RecordingRenderer::default());
        let composer = composer(two_site_table(), renderer.clone());

        let first = composer.run(&plan(&["day1.gpx"])).unwrap();
        let second = composer.run(&plan(&["day1.gpx"])).unwrap();
        assert_eq!(first, second);

        let written = renderer.written.lock().unwrap();
        assert_eq!(written[0].1, written[1].1);
    }

    #[test]
    fn test_no_sites_aborts_before_writing() {
        let renderer = Arc::new(RecordingRenderer::default());
        let empty = Table::new(vec!["lat".to_string(), "lon".to_string()], Vec::new());
        let err = composer(empty, renderer.clone())
            .run(&plan(&["day1.gpx"]))
            .unwrap_err();

        assert!(matches!(err, MapError::NoSites));
        assert!(renderer.written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bad_coordinate_aborts_before_writing() {
        let renderer = Arc::new(RecordingRenderer::default());
        let table = Table::new(
            vec!["lat".to_string(), "lon".to_string()],
            vec![vec!["10".to_string(), "".to_string()]],
        );
        let err = composer(table, renderer.clone()).run(&plan(&[])).unwrap_err();

        assert!(matches!(err, MapError::InvalidCoordinate { .. }));
        assert!(renderer.written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_end_to_end_with_file_adapters() {
        use crate::infrastructure::config::{OutputSettings, TextEncoding};
        use crate::infrastructure::csv_table::CsvTableRepository;
        use crate::infrastructure::gpx_repository::GpxTraceRepository;
        use crate::presentation::leaflet::LeafletRenderer;

        let dir = tempfile::tempdir().unwrap();
        let sites = dir.path().join("sites.csv");
        let day1 = dir.path().join("day1.gpx");
        let output = dir.path().join("expedition_map.html");

        std::fs::write(
            &sites,
            "Site_Name, Latitude ,Longitude,Temperature,photos\n\
             Jupiter,49.9,-63.5,9.5,https://x/1.jpg;https://x/2.jpg\n\
             Vauréal,49.8,-62.7,,\n",
        )
        .unwrap();
        std::fs::write(
            &day1,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="tests" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="49.85" lon="-63.0"><name>Falls</name></wpt>
  <trk><trkseg>
    <trkpt lat="49.9" lon="-63.5"></trkpt>
    <trkpt lat="49.85" lon="-63.1"></trkpt>
    <trkpt lat="49.8" lon="-62.7"></trkpt>
  </trkseg></trk>
</gpx>
"#,
        )
        .unwrap();

        let composer = MapComposer::new(
            Arc::new(CsvTableRepository::new(TextEncoding::Auto)),
            Arc::new(GpxTraceRepository),
            Arc::new(LeafletRenderer::new(&OutputSettings::default())),
            MapStyle::default(),
        );
        let summary = composer
            .run(&ExpeditionPlan {
                sites,
                traces: vec![day1, dir.path().join("day2.gpx")],
                output: output.clone(),
            })
            .unwrap();

        assert_eq!(summary.site_count, 2);
        assert_eq!(summary.line_layers, 1);
        assert_eq!(summary.marker_layers, 3);
        assert_eq!(summary.skipped_traces, 1);

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("Jupiter"));
        assert!(html.contains("Vauréal"));
        assert!(html.contains("9.5 °C"));
        assert_eq!(html.matches("<img src=").count(), 2);
    }

    #[test]
    fn test_single_point_lines_are_not_drawn() {
        let renderer = Arc::new(RecordingRenderer::default());
        let composer = composer(two_site_table(), renderer);
        let sites = normalize_sites(&two_site_table()).unwrap();
        let traces = TraceCollection {
            geometries: vec![
                TraceGeometry::Route {
                    points: vec![LatLon::new(1.0, 1.0)],
                },
                TraceGeometry::Route {
                    points: vec![LatLon::new(1.0, 1.0), LatLon::new(2.0, 2.0)],
                },
            ],
            skipped: Vec::new(),
        };

        let artifact = composer.compose(&sites, &traces).unwrap();
        assert_eq!(artifact.line_count(), 1);
        match &artifact.layers()[0] {
            Layer::Line { style, .. } => assert_eq!(style.color, "green"),
            other => panic!("expected a route line, got {:?}", other),
        }
    }
}
