// Leaflet renderer - Writes the map artifact as one self-contained HTML page
use crate::application::repositories::MapRenderer;
use crate::domain::map::{Layer, MapArtifact, MarkerPopup};
use crate::error::{MapError, Result};
use crate::infrastructure::config::OutputSettings;
use crate::presentation::popup_html::{escape_html, popup_html};
use serde::Serialize;
use std::path::Path;

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{title}}</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css"
    crossorigin="anonymous" referrerpolicy="no-referrer" />
  <style>
    html, body { height: 100%; margin: 0; }
    #map { position: absolute; inset: 0; }
    .flag-marker { font-size: 20px; text-shadow: 0 0 3px #fff; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const data = {{map_data}};
    const map = L.map("map").setView(data.center, data.zoom);
    L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
      maxZoom: 19,
      attribution: "&copy; OpenStreetMap contributors"
    }).addTo(map);

    function flagIcon(color) {
      return L.divIcon({
        className: "flag-marker",
        html: '<i class="fa-solid fa-flag" style="color:' + color + '"></i>',
        iconSize: [20, 20],
        iconAnchor: [4, 20]
      });
    }

    for (const layer of data.layers) {
      if (layer.kind === "line") {
        L.polyline(layer.points, {
          color: layer.color,
          weight: layer.weight,
          opacity: layer.opacity
        }).addTo(map);
        continue;
      }
      const options = layer.color ? { icon: flagIcon(layer.color) } : {};
      const marker = L.marker(layer.position, options)
        .bindPopup(layer.popup, { maxWidth: data.popup_max_width });
      if (layer.tooltip) {
        marker.bindTooltip(layer.tooltip);
      }
      marker.addTo(map);
    }
  </script>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct MapView<'a> {
    center: [f64; 2],
    zoom: u8,
    popup_max_width: u32,
    layers: Vec<LayerView<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LayerView<'a> {
    Line {
        points: Vec<[f64; 2]>,
        color: &'a str,
        weight: f64,
        opacity: f64,
    },
    Marker {
        position: [f64; 2],
        tooltip: Option<String>,
        popup: String,
        color: Option<&'a str>,
    },
}

/// Replace `{{key}}` placeholders in a single pass over the template, so
/// substituted values are never scanned for placeholders themselves.
fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (value, end))
        });
        match value {
            Some((value, end)) => {
                result.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                result.push_str("{{");
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    title: String,
    popup_max_width: u32,
    photo_width: u32,
}

impl LeafletRenderer {
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            title: settings.title.clone(),
            popup_max_width: settings.popup_max_width,
            photo_width: settings.photo_width,
        }
    }

    fn layer_view<'a>(&self, layer: &'a Layer) -> LayerView<'a> {
        match layer {
            Layer::Line { points, style, .. } => LayerView::Line {
                points: points.iter().map(|p| p.as_pair()).collect(),
                color: &style.color,
                weight: style.weight,
                opacity: style.opacity,
            },
            Layer::Marker(marker) => LayerView::Marker {
                position: marker.position.as_pair(),
                tooltip: marker.tooltip.as_deref().map(escape_html),
                popup: match &marker.popup {
                    MarkerPopup::Text(text) => escape_html(text),
                    MarkerPopup::Content(content) => popup_html(content, self.photo_width),
                },
                color: marker.color.as_deref(),
            },
        }
    }

    /// Layer data as embedded in the page
    fn map_data(&self, artifact: &MapArtifact) -> Result<String> {
        let view = MapView {
            center: artifact.viewport.center.as_pair(),
            zoom: artifact.viewport.zoom,
            popup_max_width: self.popup_max_width,
            layers: artifact.layers().iter().map(|l| self.layer_view(l)).collect(),
        };
        // Keep "</script>" inside strings from closing the script element
        Ok(serde_json::to_string(&view)?.replace("</", "<\\/"))
    }

    pub fn render(&self, artifact: &MapArtifact) -> Result<String> {
        let vars = [
            ("title", escape_html(&self.title)),
            ("map_data", self.map_data(artifact)?),
        ];
        Ok(fill_template(PAGE_TEMPLATE, &vars))
    }
}

impl MapRenderer for LeafletRenderer {
    fn write_map(&self, artifact: &MapArtifact, path: &Path) -> Result<()> {
        let html = self.render(artifact)?;
        std::fs::write(path, html).map_err(|source| MapError::Output {
            path: path.to_path_buf(),
            source,
        })
    }
}
