//! Writing elements and values back out as markup.

use crate::ast::*;

/// Serialize an element (and its subtree) to a string.
pub fn element_to_string(elem: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, elem);
    out
}

/// Append an element to `out`. Elements without children self-close; an
/// element whose only child is empty text gets an explicit closing tag.
pub fn write_element(out: &mut String, elem: &Element) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if elem.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &elem.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&elem.name.full_name());
    out.push('>');
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(elem) => write_element(out, elem),
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
    }
}

pub fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

pub fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Quote a value as a single-quoted CSS string.
pub fn css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            // CSS strings cannot hold raw newlines
            '\n' => out.push_str("\\a "),
            c if c.is_control() => {}
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Format a number with the given precision, removing unnecessary zeros.
pub fn format_number(n: f64, precision: u8) -> String {
    if n == 0.0 || !n.is_finite() {
        return "0".into();
    }

    let factor = 10f64.powi(precision as i32);
    let scaled = n * factor;
    if !scaled.is_finite() {
        return format!("{}", n.round());
    }
    let rounded = scaled.round() / factor;

    if rounded == 0.0 {
        return "0".into();
    }

    if rounded.fract() == 0.0 {
        return format!("{}", rounded);
    }

    let mut s = format!("{:.prec$}", rounded, prec = precision as usize);

    if s.contains('.') {
        s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    }

    // 0.5 -> .5
    if let Some(rest) = s.strip_prefix("0.") {
        s = format!(".{}", rest);
    } else if let Some(rest) = s.strip_prefix("-0.") {
        s = format!("-.{}", rest);
    }

    s
}
