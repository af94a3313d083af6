//! Reducing a generated SVG document to an embeddable fragment.
//!
//! Image providers hand back complete documents: an XML declaration, maybe a
//! DOCTYPE, and an outer `<svg>` carrying the provider's own size and
//! viewBox. To reuse the drawing inside another document we only want what
//! sits between the outer tags.
//!
//! This is plain text substitution. Nothing is validated, and a malformed
//! document yields a malformed fragment.

use crate::error::{Error, Result};

/// Strip XML declarations, DOCTYPE declarations and the outer `<svg>` tags.
///
/// Input without an outer `<svg>` passes through with only the declarations
/// removed. Input with neither comes back unchanged, and so does any output
/// that no longer contains an `<svg>` tag.
pub fn sanitize_icon(raw: &str) -> String {
    let stripped = strip_declarations(raw);
    let unwrapped = strip_outer_svg(&stripped);
    if unwrapped.len() == stripped.len() {
        return unwrapped;
    }
    // Removing the tags can join the halves of a declaration
    strip_declarations(&unwrapped)
}

/// Decode the raw bytes returned by an image provider.
pub fn decode_icon(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::Utf8(e.utf8_error()))
}

/// Strip XML declarations and DOCTYPEs until none are left. One removal can
/// expose another, as in `<?x<!DOCTYPE a>ml ...?>`.
fn strip_declarations(s: &str) -> String {
    let mut current = s.to_string();
    loop {
        let next = strip_doctypes(&strip_xml_declarations(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_xml_declarations(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = find_xml_declaration(rest) {
        let Some(len) = rest[start..].find("?>") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + len + 2..];
    }

    out.push_str(rest);
    out
}

/// `<?xml` followed by whitespace or `?`, so `<?xml-stylesheet ...?>` stays.
fn find_xml_declaration(s: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(i) = s[offset..].find("<?xml") {
        let at = offset + i;
        match s[at + 5..].chars().next() {
            Some(c) if c.is_ascii_whitespace() || c == '?' => return Some(at),
            _ => offset = at + 5,
        }
    }
    None
}

fn strip_doctypes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("<!DOCTYPE") {
        let Some(len) = doctype_len(&rest[start..]) else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + len..];
    }

    out.push_str(rest);
    out
}

/// Length of a DOCTYPE declaration, internal subset included.
fn doctype_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn strip_outer_svg(s: &str) -> String {
    let Some(open_start) = find_open_tag(s, "svg") else {
        return s.to_string();
    };
    let Some(open_len) = tag_len(&s[open_start..]) else {
        return s.to_string();
    };
    let open_end = open_start + open_len;

    let before = &s[..open_start];
    let after_open = &s[open_end..];

    // `<svg .../>` has no body to keep
    if s[..open_end].ends_with("/>") {
        return format!("{}{}", before, after_open);
    }

    match find_last_close_tag(after_open, "svg") {
        Some((close_start, close_end)) => format!(
            "{}{}{}",
            before,
            &after_open[..close_start],
            &after_open[close_end..]
        ),
        None => format!("{}{}", before, after_open),
    }
}

/// Find `<name` where the name is complete (followed by whitespace, `>` or `/`).
fn find_open_tag(s: &str, name: &str) -> Option<usize> {
    let needle = format!("<{}", name);
    let mut offset = 0;
    while let Some(i) = s[offset..].find(&needle) {
        let at = offset + i;
        match s[at + needle.len()..].chars().next() {
            Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/' => return Some(at),
            _ => offset = at + needle.len(),
        }
    }
    None
}

/// Length of the tag starting at `s[0]`, skipping `>` inside quoted values.
fn tag_len(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Byte range of the last `</name>` (whitespace allowed before `>`).
fn find_last_close_tag(s: &str, name: &str) -> Option<(usize, usize)> {
    let needle = format!("</{}", name);
    let mut search_end = s.len();
    while let Some(start) = s[..search_end].rfind(&needle) {
        let tail = &s[start + needle.len()..];
        let trimmed = tail.trim_start();
        if trimmed.starts_with('>') {
            let end = start + needle.len() + (tail.len() - trimmed.len()) + 1;
            return Some((start, end));
        }
        search_end = start;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER_OUTPUT: &str = r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd"><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1024 1024" width="1024" height="1024"><path d="M0 0L10 10"/><g fill="red"><circle cx="5" cy="5" r="2"/></g></svg>"#;

    #[test]
    fn test_full_document() {
        assert_eq!(
            sanitize_icon(PROVIDER_OUTPUT),
            r#"<path d="M0 0L10 10"/><g fill="red"><circle cx="5" cy="5" r="2"/></g>"#
        );
    }

    #[test]
    fn test_no_wrapper_passes_through() {
        let fragment = r#"<path d="M1 2 3 4"/>  <rect width="3"/>"#;
        assert_eq!(sanitize_icon(fragment), fragment);
        assert_eq!(sanitize_icon(""), "");
    }

    #[test]
    fn test_idempotent() {
        for input in [PROVIDER_OUTPUT, "<path/>", "plain text", "<svg>"] {
            let once = sanitize_icon(input);
            assert_eq!(sanitize_icon(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_declaration_split_by_doctype() {
        let input = r#"<?x<!DOCTYPE a>ml version="1.0"?><path/>"#;
        let once = sanitize_icon(input);
        assert_eq!(once, "<path/>");
        assert_eq!(sanitize_icon(&once), once);

        let input = r#"<?x<svg>ml version="1.0"?><path/></svg>"#;
        assert_eq!(sanitize_icon(input), "<path/>");
    }

    #[test]
    fn test_idempotent_over_generated_inputs() {
        const PIECES: &[&str] = &[
            r#"<?xml version="1.0"?>"#,
            "<?x",
            "ml ?>",
            "<!DOCTYPE svg>",
            "<!DOC",
            "TYPE a>",
            "<svg>",
            "</svg>",
            "<sv",
            "g>",
            "?>",
            "<path/>",
            "[",
            "text",
        ];

        let mut inputs = vec![String::new()];
        for _ in 0..4 {
            let longer: Vec<String> = inputs
                .iter()
                .flat_map(|prefix| PIECES.iter().map(move |p| format!("{prefix}{p}")))
                .collect();
            inputs.extend(longer);
            inputs.sort();
            inputs.dedup();
        }

        for input in &inputs {
            let once = sanitize_icon(input);
            if find_open_tag(&once, "svg").is_some() {
                // A nested <svg> becomes the next wrapper
                continue;
            }
            assert_eq!(sanitize_icon(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_declarations_without_wrapper() {
        let input = "<?xml version=\"1.0\"?>\n<path/>";
        assert_eq!(sanitize_icon(input), "\n<path/>");
    }

    #[test]
    fn test_stylesheet_pi_is_kept() {
        let input = r#"<?xml-stylesheet href="a.css"?><path/>"#;
        assert_eq!(sanitize_icon(input), input);
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let input = r#"<!DOCTYPE svg [ <!ENTITY ns "http://x"> ]><svg><path/></svg>"#;
        assert_eq!(sanitize_icon(input), "<path/>");
    }

    #[test]
    fn test_multiline_wrapper() {
        let input = "<svg\n  xmlns=\"http://www.w3.org/2000/svg\"\n  viewBox=\"0 0 1 1\">\n<path/>\n</svg >\n";
        assert_eq!(sanitize_icon(input), "\n<path/>\n\n");
    }

    #[test]
    fn test_gt_inside_attribute_value() {
        let input = r#"<svg data-note="a>b"><path/></svg>"#;
        assert_eq!(sanitize_icon(input), "<path/>");
    }

    #[test]
    fn test_nested_svg_keeps_inner_element() {
        let input = r#"<svg><svg x="1"><path/></svg></svg>"#;
        assert_eq!(sanitize_icon(input), r#"<svg x="1"><path/></svg>"#);
    }

    #[test]
    fn test_self_closing_wrapper() {
        assert_eq!(sanitize_icon(r#"<svg width="1"/>"#), "");
    }

    #[test]
    fn test_similar_tag_names_are_not_wrappers() {
        let input = "<svgx><path/></svgx>";
        assert_eq!(sanitize_icon(input), input);
    }

    #[test]
    fn test_unterminated_wrapper_is_left_alone() {
        let input = "<svg width=\"1\"";
        assert_eq!(sanitize_icon(input), input);
    }

    #[test]
    fn test_decode_icon() {
        assert_eq!(decode_icon(b"<path/>".to_vec()).unwrap(), "<path/>");
        assert!(matches!(decode_icon(vec![0xff, 0xfe]), Err(Error::Utf8(_))));
    }
}
