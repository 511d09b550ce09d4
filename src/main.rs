// Main entry point - Dependency injection and a single map run
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use expedition_map::application::map_composer::MapComposer;
use expedition_map::infrastructure::config::load_expedition_config;
use expedition_map::infrastructure::csv_table::CsvTableRepository;
use expedition_map::infrastructure::gpx_repository::GpxTraceRepository;
use expedition_map::presentation::leaflet::LeafletRenderer;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_expedition_config().context("failed to load config/expedition")?;

    // Create repositories (infrastructure layer)
    let tables = Arc::new(CsvTableRepository::new(config.sites.encoding));
    let traces = Arc::new(GpxTraceRepository);

    // Create renderer (presentation layer)
    let renderer = Arc::new(LeafletRenderer::new(&config.output));

    // Compose and emit the map (application layer)
    let composer = MapComposer::new(tables, traces, renderer, config.map_style());
    let summary = composer
        .run(&config.plan())
        .context("failed to build expedition map")?;

    tracing::info!(
        "Map centered on ({:.5}, {:.5}) with {} lines and {} markers ({} trace files skipped)",
        summary.center.lat,
        summary.center.lon,
        summary.line_layers,
        summary.marker_layers,
        summary.skipped_traces
    );

    Ok(())
}
