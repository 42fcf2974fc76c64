/// Escape text for safe embedding in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML body for a shared summary. Line breaks survive through `pre-wrap`.
pub fn render_summary_html(heading: &str, summary: &str) -> String {
    format!(
        "<div style=\"font-family:Arial,sans-serif\">\n  <h2>{}</h2>\n  <div style=\"white-space:pre-wrap\">{}</div>\n</div>",
        escape_html(heading),
        escape_html(summary)
    )
}
