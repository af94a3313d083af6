//! The outer `<svg>` document a composition is shown or saved in.

use std::fmt;
use std::str::FromStr;

use crate::compose::Composition;
use crate::error::{Error, Result};
use crate::markup::{format_number, push_escaped_attr};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// An SVG `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            format_number(self.x, 4),
            format_number(self.y, 4),
            format_number(self.width, 4),
            format_number(self.height, 4)
        )
    }
}

impl FromStr for ViewBox {
    type Err = Error;

    /// Parse `"x y w h"`; commas work as separators too.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|_| Error::InvalidSvg(format!("bad viewBox number: {p}")))
            })
            .collect::<Result<_>>()?;

        let [x, y, width, height] = parts[..] else {
            return Err(Error::InvalidSvg(format!(
                "viewBox needs 4 numbers, got {}",
                parts.len()
            )));
        };
        if width < 0.0 || height < 0.0 {
            return Err(Error::InvalidSvg(format!("negative viewBox size: {s}")));
        }
        Ok(Self::new(x, y, width, height))
    }
}

/// A fixed-size SVG canvas chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub view_box: Option<ViewBox>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            view_box: None,
        }
    }

    pub fn with_view_box(mut self, view_box: ViewBox) -> Self {
        self.view_box = Some(view_box);
        self
    }

    /// The `viewBox` in effect: the explicit one, or `0 0 width height`.
    pub fn effective_view_box(&self) -> ViewBox {
        self.view_box
            .unwrap_or_else(|| ViewBox::new(0.0, 0.0, self.width, self.height))
    }

    /// Wrap a composition into a standalone SVG document.
    pub fn wrap(&self, composition: &Composition) -> String {
        let mut out = String::new();
        out.push_str("<svg xmlns=\"");
        out.push_str(SVG_NS);
        out.push_str("\" width=\"");
        out.push_str(&format_number(self.width, 4));
        out.push_str("\" height=\"");
        out.push_str(&format_number(self.height, 4));
        out.push_str("\" viewBox=\"");
        push_escaped_attr(&mut out, &self.effective_view_box().to_string());
        out.push_str("\" preserveAspectRatio=\"xMidYMid meet\">");
        out.push_str(&composition.concat());
        out.push_str("</svg>");
        out
    }
}

/// Lowercase, dash-separated, ASCII-word-only form of `text`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    slug
}

/// File name to save a logo under: `<slug>.svg`, or `logo.svg`.
pub fn download_file_name(brand_name: &str) -> String {
    let slug = slugify(brand_name);
    if slug.is_empty() {
        "logo.svg".to_string()
    } else {
        format!("{slug}.svg")
    }
}
