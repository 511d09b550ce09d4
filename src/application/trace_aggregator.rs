// Trace aggregator - Best-effort loading of every trace file of a run
use crate::application::repositories::TraceRepository;
use crate::domain::trace::{SkipReason, SkippedTrace, TraceCollection, TraceGeometry};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct TraceAggregator {
    repository: Arc<dyn TraceRepository>,
}

impl TraceAggregator {
    pub fn new(repository: Arc<dyn TraceRepository>) -> Self {
        Self { repository }
    }

    /// Load `files` in order. A file that is missing or unreadable is recorded
    /// as skipped and never stops the remaining files from loading.
    pub fn aggregate(&self, files: &[PathBuf]) -> TraceCollection {
        files
            .iter()
            .fold(TraceCollection::default(), |mut collection, path| {
                match self.repository.load_trace(path) {
                    Ok(document) => {
                        let geometries = TraceGeometry::from_document(document);
                        tracing::debug!(
                            "Loaded {} geometries from {}",
                            geometries.len(),
                            path.display()
                        );
                        collection.geometries.extend(geometries);
                    }
                    Err(e) if e.is_missing() => {
                        tracing::warn!("Could not find {}, skipping", path.display());
                        collection.skipped.push(SkippedTrace {
                            path: path.clone(),
                            reason: SkipReason::Missing,
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Error loading {}: {}", path.display(), e);
                        collection.skipped.push(SkippedTrace {
                            path: path.clone(),
                            reason: SkipReason::Unreadable(e.to_string()),
                        });
                    }
                }
                collection
            })
    }
}
