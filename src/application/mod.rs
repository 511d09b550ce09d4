// Application layer - Use cases and the traits they depend on
pub mod map_composer;
pub mod photo_links;
pub mod popup_builder;
pub mod repositories;
pub mod schema_normalizer;
pub mod trace_aggregator;
