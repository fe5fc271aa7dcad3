/// Escapes a value for interpolation into HTML text or attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The popup card fragment: image block, title, description. Every
/// interpolated value is escaped. A missing image drops the block instead
/// of pointing the tag at nothing.
pub fn informative_card(name: &str, description: &str, image: Option<&str>) -> String {
    let name = escape_html(name);
    let description = escape_html(description);

    let mut card = String::new();
    if let Some(image) = image {
        let image = escape_html(image);
        card.push_str(&format!(
            "<div class=\"card-container\">\n  <img class=\"card-img\" src=\"{image}\" alt=\"{name}\">\n</div>\n"
        ));
    }
    card.push_str(&format!(
        "<div class=\"card-body\" style=\"margin-top:10px\">\n  <h2 class=\"card-title\">{name}</h2>\n  <p class=\"card-text\">{description}</p>\n</div>\n"
    ));
    card
}
