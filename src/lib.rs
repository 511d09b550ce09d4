//! Composes expedition site tables and GPX traces into a single Leaflet map page.
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use error::{MapError, Result, TraceReadError};
