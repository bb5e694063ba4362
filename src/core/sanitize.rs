//! Escaping for text that enters the transcript.
//!
//! Every string that ends up in the visible log — nicknames on assignment,
//! message text on compose and on arrival — passes through [`sanitize`] so
//! that markup-significant characters never reach the renderer raw.

/// Escape `& < > " '` using HTML entities, ampersand first.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_markup_characters() {
        let escaped = sanitize(r#"<b>&"it's"</b>"#);
        for raw in ['<', '>', '"', '\''] {
            assert!(
                !escaped.contains(raw),
                "raw {raw:?} survived in {escaped:?}"
            );
        }
        assert_eq!(escaped, "&lt;b&gt;&amp;&quot;it&#x27;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn every_ampersand_in_output_starts_an_entity() {
        let escaped = sanitize(r#"a & b < c "quoted" 'solo'"#);
        let entities = ["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;"];
        for (idx, _) in escaped.match_indices('&') {
            assert!(
                entities.iter().any(|e| escaped[idx..].starts_with(e)),
                "bare ampersand at {idx} in {escaped:?}"
            );
        }
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("labas vakaras"), "labas vakaras");
    }

    #[test]
    fn ampersand_is_escaped_before_other_entities() {
        // Escaping must not double-process the ampersands it introduces.
        assert_eq!(sanitize("&lt;"), "&amp;lt;");
    }
}
