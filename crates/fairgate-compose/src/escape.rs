// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML escaping for attendee-supplied fields.
//!
//! Attendee names and emails come from registration storage and are never
//! trusted as markup. Every interpolation into an HTML template goes through
//! [`escape_html`] first.

/// Escapes the five characters with meaning in HTML text and attribute
/// positions.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_html("Ada Lovelace"), "Ada Lovelace");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn escapes_ampersand_first() {
        assert_eq!(escape_html("a&lt;"), "a&amp;lt;");
    }

    #[test]
    fn empty_string() {
        assert_eq!(escape_html(""), "");
    }
}
