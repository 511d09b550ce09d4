// Map artifact domain model
use super::geo::LatLon;
use super::popup::PopupContent;

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

impl LineStyle {
    pub fn new(color: &str, weight: f64, opacity: f64) -> Self {
        Self {
            color: color.to_string(),
            weight,
            opacity,
        }
    }
}

/// Visual choices applied uniformly across one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub zoom: u8,
    pub track: LineStyle,
    pub route: LineStyle,
    pub waypoint_color: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            zoom: 10,
            track: LineStyle::new("blue", 3.0, 0.7),
            route: LineStyle::new("green", 3.0, 0.7),
            waypoint_color: "red".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Track,
    Route,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerPopup {
    Text(String),
    Content(PopupContent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLon,
    pub tooltip: Option<String>,
    pub popup: MarkerPopup,
    /// Icon colour; `None` keeps the renderer's default marker.
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Line {
        kind: LineKind,
        points: Vec<LatLon>,
        style: LineStyle,
    },
    Marker(Marker),
}

/// The map under construction: a viewport plus layers in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapArtifact {
    pub viewport: Viewport,
    layers: Vec<Layer>,
}

impl MapArtifact {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: Vec::new(),
        }
    }

    pub fn add_line(&mut self, kind: LineKind, points: Vec<LatLon>, style: &LineStyle) {
        self.layers.push(Layer::Line {
            kind,
            points,
            style: style.clone(),
        });
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.layers.push(Layer::Marker(marker));
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn line_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| matches!(l, Layer::Line { .. }))
            .count()
    }

    pub fn marker_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| matches!(l, Layer::Marker(_)))
            .count()
    }
}
