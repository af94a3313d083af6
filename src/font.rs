//! Embedded fonts for the wordmark label.
//!
//! A [`FontFace`] carries a font as a base64 payload. It is written out as an
//! `@font-face` rule whose source is a `data:` URL, so the composed logo
//! renders the same everywhere without fetching anything.
//!
//! The inspection half ([`extract_font_faces`], [`extract_text_chars`]) reads
//! those rules and the label text back out of a parsed document. Callers use
//! it to check what a logo embeds, e.g. before subsetting the font.

use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::ast::{Document, Element, Node};
use crate::markup::{css_string, element_to_string};

/// Container format of an embedded font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    #[default]
    TrueType,
    OpenType,
    Woff,
    Woff2,
}

impl FontFormat {
    /// Guess the format from a file extension; unknown extensions are
    /// treated as TrueType.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "otf" => Self::OpenType,
            "woff" => Self::Woff,
            "woff2" => Self::Woff2,
            _ => Self::TrueType,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::TrueType => "font/ttf",
            Self::OpenType => "font/otf",
            Self::Woff => "font/woff",
            Self::Woff2 => "font/woff2",
        }
    }

    /// The `format()` hint used in `@font-face` sources.
    pub fn css_format(&self) -> &'static str {
        match self {
            Self::TrueType => "truetype",
            Self::OpenType => "opentype",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }
}

/// A font ready to embed: family name plus base64-encoded font data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFace {
    pub name: String,
    pub base64_payload: String,
    pub format: FontFormat,
}

impl FontFace {
    pub fn new(name: impl Into<String>, base64_payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base64_payload: base64_payload.into(),
            format: FontFormat::default(),
        }
    }

    /// Build a face from raw font bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8], format: FontFormat) -> Self {
        Self {
            name: name.into(),
            base64_payload: STANDARD.encode(bytes),
            format,
        }
    }

    pub fn with_format(mut self, format: FontFormat) -> Self {
        self.format = format;
        self
    }

    /// `data:` URL holding the font.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.base64_payload
        )
    }

    /// The `@font-face` rule for this font.
    pub fn css_rule(&self) -> String {
        format!(
            "@font-face {{ font-family: {}; src: url(\"{}\") format(\"{}\"); }}",
            css_string(&self.name),
            self.data_url(),
            self.format.css_format()
        )
    }

    /// A `<style>` element declaring the font face.
    pub fn to_markup(&self) -> String {
        let style = Element::new("style")
            .with_attr("type", "text/css")
            .with_text(self.css_rule());
        element_to_string(&style)
    }
}

/// Collect every character used inside `<text>`, `<tspan>` and `<textPath>`.
pub fn extract_text_chars(doc: &Document) -> HashSet<char> {
    let mut chars = HashSet::new();
    doc.for_each_element(|elem| {
        if elem.is("text") || elem.is("tspan") || elem.is("textPath") {
            chars.extend(elem.text_content().chars());
        }
    });
    chars
}

/// A parsed `@font-face` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaceRef {
    pub family: String,
    pub url: String,
    pub format: Option<String>,
}

/// Extract the `@font-face` rules from a document's `<style>` elements.
pub fn extract_font_faces(doc: &Document) -> Vec<FontFaceRef> {
    let mut faces = Vec::new();
    doc.for_each_element(|elem| {
        if elem.is("style") {
            for child in &elem.children {
                if let Node::Text(css) | Node::CData(css) = child {
                    faces.extend(parse_font_faces(css));
                }
            }
        }
    });
    faces
}

fn parse_font_faces(css: &str) -> Vec<FontFaceRef> {
    let mut faces = Vec::new();
    let mut remaining = css;

    while let Some(start) = remaining.find("@font-face") {
        remaining = &remaining[start + "@font-face".len()..];

        let Some(open) = remaining.find('{') else {
            break;
        };
        let Some(close) = remaining[open..].find('}') else {
            break;
        };

        let block = &remaining[open + 1..open + close];
        remaining = &remaining[open + close + 1..];

        if let Some(face) = parse_font_face_block(block) {
            faces.push(face);
        }
    }

    faces
}

fn parse_font_face_block(block: &str) -> Option<FontFaceRef> {
    let mut family = None;
    let mut url = None;
    let mut format = None;

    for decl in declarations(block) {
        let decl = decl.trim();
        if let Some(v) = decl.strip_prefix("font-family:") {
            family = Some(unquote(v.trim()));
        } else if let Some(v) = decl.strip_prefix("src:") {
            url = between(v, "url(", ")").map(unquote);
            format = between(v, "format(", ")").map(unquote);
        }
    }

    Some(FontFaceRef {
        family: family?,
        url: url?,
        format,
    })
}

/// Split a declaration block on `;`, ignoring those inside quotes or
/// parentheses (`data:font/ttf;base64,...`).
fn declarations(block: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in block.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&block[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&block[start..]);
    out
}

fn between<'a>(s: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = s.find(open)? + open.len();
    let end = s[start..].find(close)? + start;
    Some(s[start..end].trim())
}

fn unquote(v: &str) -> String {
    let v = v.trim();
    let inner = v
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| v.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .unwrap_or(v);
    inner.replace("\\'", "'").replace("\\\\", "\\")
}
