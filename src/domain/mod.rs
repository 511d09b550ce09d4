// Domain layer - Plain data shared by every other layer
pub mod geo;
pub mod map;
pub mod popup;
pub mod site;
pub mod table;
pub mod trace;
