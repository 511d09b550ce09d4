// Repository traits for the file primitives the pipeline depends on
use crate::domain::map::MapArtifact;
use crate::domain::table::Table;
use crate::domain::trace::TraceDocument;
use crate::error::{Result, TraceReadError};
use std::path::Path;

pub trait TableRepository: Send + Sync {
    /// Read a delimited file with a header row
    fn read_table(&self, path: &Path) -> Result<Table>;

    /// Write a table back out with its header row
    fn write_table(&self, path: &Path, table: &Table) -> Result<()>;
}

pub trait TraceRepository: Send + Sync {
    /// Parse one trace file into its tracks, routes and waypoints
    fn load_trace(&self, path: &Path) -> Result<TraceDocument, TraceReadError>;
}

pub trait MapRenderer: Send + Sync {
    /// Serialize the finished artifact to `path` in a single write.
    /// Nothing is written if rendering fails.
    fn write_map(&self, artifact: &MapArtifact, path: &Path) -> Result<()>;
}
