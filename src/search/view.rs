//! Rendering interface between the matcher and whatever shows its results.

/// One line of the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEntry {
    Link { href: String, title: String, description: String },
    /// Shown alone when nothing matched.
    Placeholder { text: String },
}

impl ResultEntry {
    /// List item markup for this entry, with text escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Link { href, title, description } => format!(
                "<li><a href=\"{}\"><strong>{}</strong> <small>{}</small></a></li>",
                escape_html(href),
                escape_html(title),
                escape_html(description)
            ),
            Self::Placeholder { text } => {
                format!("<li role=\"status\">{}</li>", escape_html(text))
            }
        }
    }
}

/// Markup of a whole result list.
#[must_use]
pub fn render_list(entries: &[ResultEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul>");
    for entry in entries {
        html.push_str(&entry.to_html());
    }
    html.push_str("</ul>");
    html
}

/// Escapes text for use in element content and attribute values.
fn escape_html(text: &str) -> String {
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

/// Surface the matcher renders into.
pub trait ResultsView {
    /// Links the input to the result container and starts collapsed.
    fn bind(&mut self) {}

    /// Replaces the visible entries and marks the panel expanded.
    fn show(&mut self, entries: Vec<ResultEntry>);

    /// Clears the entries and marks the panel collapsed.
    fn close(&mut self);
}
