// Popup HTML for site and waypoint markers
use crate::domain::popup::PopupContent;
use std::fmt::Write;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Heading, one bold-labelled line per block, then photos stacked at `photo_width`.
pub fn popup_html(content: &PopupContent, photo_width: u32) -> String {
    let mut html = format!("<h4>{}</h4>", escape_html(&content.title));

    for block in &content.blocks {
        let _ = write!(
            html,
            "<b>{}:</b> {}",
            escape_html(&block.label),
            escape_html(&block.value)
        );
        if let Some(unit) = &block.unit {
            let _ = write!(html, " {}", escape_html(unit));
        }
        html.push_str("<br>");
    }

    for media in &content.media {
        let _ = write!(
            html,
            "<img src=\"{}\" width=\"{}\" style=\"display:block; margin-bottom:5px;\">",
            escape_html(&media.url),
            photo_width
        );
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::popup::{ContentBlock, MediaRef};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Fish & Chips"</b>'"#),
            "&lt;b&gt;&quot;Fish &amp; Chips&quot;&lt;/b&gt;&#39;"
        );
    }

    #[test]
    fn test_popup_html_layout() {
        let content = PopupContent {
            title: "Pool <3>".to_string(),
            blocks: vec![
                ContentBlock::new("Lat", "49.1".to_string(), None),
                ContentBlock::new("Temperature", "12".to_string(), Some("°C")),
            ],
            media: vec![MediaRef {
                url: "https://drive.google.com/uc?id=A&b".to_string(),
            }],
        };

        assert_eq!(
            popup_html(&content, 200),
            "<h4>Pool &lt;3&gt;</h4>\
             <b>Lat:</b> 49.1<br>\
             <b>Temperature:</b> 12 °C<br>\
             <img src=\"https://drive.google.com/uc?id=A&amp;b\" width=\"200\" \
             style=\"display:block; margin-bottom:5px;\">"
        );
    }
}
