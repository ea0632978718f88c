//! The static "about" panel shown by the front-end.

pub const ABOUT_TEXT: &str = "Chronicle is a timeline of publicly reported data breaches. Each entry \
    records who was breached, when it happened, how many records were exposed & who is thought to be \
    responsible, with links to the original sources. Members can vote on entries to flag those that are \
    disputed or need more detail.";

///
/// Render the about panel markup.
///
pub fn render() -> String {
    format!(r#"<div class="container"><div class="about"><p>{}</p></div></div>"#, escape(ABOUT_TEXT))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&'  => escaped.push_str("&amp;"),
            '<'  => escaped.push_str("&lt;"),
            '>'  => escaped.push_str("&gt;"),
            '"'  => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _    => escaped.push(c),
        }
    }
    escaped
}
