// Photo link rewriter - Maps file-sharing links to direct-download links
use crate::application::repositories::TableRepository;
use crate::application::schema_normalizer::normalize_column_name;
use crate::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};

static SHARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("share id pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoLinkRewriter {
    host: String,
}

/// Result of rewriting one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellRewrite {
    pub value: String,
    pub converted: usize,
    pub unconverted: Vec<String>,
}

impl PhotoLinkRewriter {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    /// Direct-download form of a sharing link, or `None` if it has no `/d/<id>` part.
    pub fn rewrite_link(&self, link: &str) -> Option<String> {
        let caps = SHARE_ID.captures(link)?;
        Some(format!("{}/uc?id={}", self.host, &caps[1]))
    }

    /// Rewrite every comma-separated link of a cell. Links that cannot be
    /// converted are kept as they are and reported.
    pub fn rewrite_cell(&self, cell: &str) -> CellRewrite {
        if cell.trim().is_empty() {
            return CellRewrite::default();
        }

        let mut result = CellRewrite::default();
        let links: Vec<String> = cell
            .split(',')
            .map(str::trim)
            .map(|link| {
                if link.is_empty() {
                    return String::new();
                }
                match self.rewrite_link(link) {
                    Some(direct) => {
                        result.converted += 1;
                        direct
                    }
                    None => {
                        tracing::warn!("Could not convert link: {}", link);
                        result.unconverted.push(link.to_string());
                        link.to_string()
                    }
                }
            })
            .collect();

        result.value = links.join(",");
        result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub rows: usize,
    pub converted: usize,
    pub unconverted: usize,
}

#[derive(Clone)]
pub struct PhotoLinkService {
    tables: Arc<dyn TableRepository>,
    rewriter: PhotoLinkRewriter,
    column: String,
}

impl PhotoLinkService {
    pub fn new(tables: Arc<dyn TableRepository>, rewriter: PhotoLinkRewriter, column: &str) -> Self {
        Self {
            tables,
            rewriter,
            column: normalize_column_name(column),
        }
    }

    /// Copy `input` to `output`, rewriting only the photos column.
    pub fn run(&self, input: &Path, output: &Path) -> Result<RewriteSummary> {
        let mut table = self.tables.read_table(input)?;
        let mut summary = RewriteSummary {
            rows: table.len(),
            ..Default::default()
        };

        let column = table
            .columns
            .iter()
            .position(|c| normalize_column_name(c) == self.column);

        match column {
            Some(idx) => {
                for row in table.rows.iter_mut() {
                    if let Some(cell) = row.get_mut(idx) {
                        let rewrite = self.rewriter.rewrite_cell(cell);
                        summary.converted += rewrite.converted;
                        summary.unconverted += rewrite.unconverted.len();
                        *cell = rewrite.value;
                    }
                }
            }
            None => {
                tracing::warn!(
                    "No '{}' column in {}, writing the table unchanged",
                    self.column,
                    input.display()
                );
            }
        }

        self.tables.write_table(output, &table)?;
        tracing::info!(
            "Wrote {} with {} direct photo links ({} left as is)",
            output.display(),
            summary.converted,
            summary.unconverted
        );
        Ok(summary)
    }
}
