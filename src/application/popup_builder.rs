// Popup content builder - Projects a site record onto display blocks
use crate::domain::popup::{ContentBlock, MediaRef, PopupContent};
use crate::domain::site::SiteRecord;

const PHOTOS_FIELD: &str = "photos";

/// Optional fields in display order: (field, label, unit)
const OPTIONAL_FIELDS: &[(&str, &str, Option<&str>)] = &[
    ("temperature", "Temperature", Some("°C")),
    ("conductivity", "Conductivity", Some("µS/cm")),
    ("team", "Team", None),
    ("fish_caught", "Fish caught", None),
    ("type", "Type", None),
    ("salmon_river", "Salmon River", None),
    ("date", "Date", None),
    ("time", "Time", None),
];

/// Split a photos cell on commas and semicolons, dropping blank tokens.
pub fn split_photo_refs(cell: &str) -> Vec<MediaRef> {
    cell.split([',', ';'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|url| MediaRef {
            url: url.to_string(),
        })
        .collect()
}

pub fn build_popup(site: &SiteRecord) -> PopupContent {
    let mut blocks = vec![
        ContentBlock::new("Lat", site.lat_text.clone(), None),
        ContentBlock::new("Lon", site.lon_text.clone(), None),
    ];

    for (field, label, unit) in OPTIONAL_FIELDS {
        if let Some(value) = site.field(field) {
            blocks.push(ContentBlock::new(label, value.to_string(), *unit));
        }
    }

    let media = site.field(PHOTOS_FIELD).map(split_photo_refs).unwrap_or_default();

    PopupContent {
        title: site.name.clone(),
        blocks,
        media,
    }
}
