use crate::application::map_composer::ExpeditionPlan;
use crate::domain::map::{LineStyle, MapStyle};
use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "config/expedition";

#[derive(Debug, Deserialize, Clone)]
pub struct ExpeditionConfig {
    pub sites: SitesSettings,
    #[serde(default)]
    pub traces: TracesSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub style: StyleSettings,
    pub links: Option<LinkSettings>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Auto,
    Utf8,
    Latin1,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SitesSettings {
    pub path: PathBuf,
    #[serde(default)]
    pub encoding: TextEncoding,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TracesSettings {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub title: String,
    pub zoom: u8,
    pub popup_max_width: u32,
    pub photo_width: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("expedition_map.html"),
            title: "Expedition Map".to_string(),
            zoom: 10,
            popup_max_width: 300,
            photo_width: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LineStyleSettings {
    pub color: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_weight() -> f64 {
    3.0
}

fn default_opacity() -> f64 {
    0.7
}

impl From<LineStyleSettings> for LineStyle {
    fn from(settings: LineStyleSettings) -> Self {
        LineStyle::new(&settings.color, settings.weight, settings.opacity)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StyleSettings {
    pub track: Option<LineStyleSettings>,
    pub route: Option<LineStyleSettings>,
    pub waypoint_color: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_photo_column")]
    pub column: String,
    #[serde(default = "default_link_host")]
    pub host: String,
}

fn default_photo_column() -> String {
    "photos".to_string()
}

fn default_link_host() -> String {
    "https://drive.google.com".to_string()
}

impl ExpeditionConfig {
    pub fn plan(&self) -> ExpeditionPlan {
        ExpeditionPlan {
            sites: self.sites.path.clone(),
            traces: self.traces.files.clone(),
            output: self.output.path.clone(),
        }
    }

    /// Map style with unset keys filled from the defaults
    pub fn map_style(&self) -> MapStyle {
        let defaults = MapStyle::default();
        MapStyle {
            zoom: self.output.zoom,
            track: self.style.track.clone().map(Into::into).unwrap_or(defaults.track),
            route: self.style.route.clone().map(Into::into).unwrap_or(defaults.route),
            waypoint_color: self
                .style
                .waypoint_color
                .clone()
                .unwrap_or(defaults.waypoint_color),
        }
    }
}

pub fn load_expedition_config() -> Result<ExpeditionConfig> {
    load_expedition_config_from(DEFAULT_CONFIG)
}

pub fn load_expedition_config_from(name: &str) -> Result<ExpeditionConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name))
        .build()?;

    Ok(settings.try_deserialize()?)
}
