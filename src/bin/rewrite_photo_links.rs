// Rewrites the photos column of a site table to direct-download links
use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

use expedition_map::application::photo_links::{PhotoLinkRewriter, PhotoLinkService};
use expedition_map::infrastructure::config::load_expedition_config;
use expedition_map::infrastructure::csv_table::CsvTableRepository;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_expedition_config().context("failed to load config/expedition")?;
    let links = config
        .links
        .ok_or_else(|| anyhow!("config/expedition has no [links] section"))?;

    let tables = Arc::new(CsvTableRepository::new(config.sites.encoding));
    let service = PhotoLinkService::new(tables, PhotoLinkRewriter::new(&links.host), &links.column);

    service
        .run(&links.input, &links.output)
        .with_context(|| format!("failed to rewrite links in {}", links.input.display()))?;

    Ok(())
}
