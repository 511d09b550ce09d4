// Presentation layer - The rendered map page
pub mod leaflet;
pub mod popup_html;
