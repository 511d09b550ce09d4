// Popup content domain models

#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub label: String,
    pub value: String,
    pub unit: Option<String>,
}

impl ContentBlock {
    pub fn new(label: &str, value: String, unit: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.map(str::to_string),
        }
    }
}

/// An inline image shown in a popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRef {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub blocks: Vec<ContentBlock>,
    pub media: Vec<MediaRef>,
}
