use std::borrow::Cow;

/// Escapes the five XML special characters. Everything else, non-ASCII
/// included, is written as is.
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    if !input.contains(|ch: char| matches!(ch, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
