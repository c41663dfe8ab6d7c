//! HTML escaping.
//!
//! Every string coming from a user or from the backend goes through
//! [`escape_html`] before it is inserted into markup.

/// Escapes the five markup-significant characters `& < > " '`.
///
/// `&` is handled in the same pass as the others, so already escaped
/// input is escaped again rather than passed through.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
