//! Composing an icon and a brand name into wordmark fragments.
//!
//! The result is three independent fragments: the icon group, the label text
//! and the font-face style. They can be dropped into any `<svg>` wrapper. The
//! composer never picks a canvas size; that is the caller's call (see
//! [`crate::Canvas`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::Element;
use crate::font::FontFace;
use crate::geometry::{BBox, measure_fragment};
use crate::layout::{Layout, LayoutParams};
use crate::markup::{css_string, element_to_string, format_number};
use crate::sanitize::sanitize_icon;

/// `id` of the group wrapping the icon.
pub const ICON_GROUP_ID: &str = "icon";

/// Output formatting options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// Decimal places for numbers written into the markup (default: 4)
    pub precision: u8,
    /// Label fill color
    pub label_fill: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            label_fill: "black".to_string(),
        }
    }
}

/// Where the label's anchor point sits, in the wrapper's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub label_x: f64,
    pub label_y: f64,
}

/// The composed wordmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// `<g id="icon" transform="...">` around the sanitized icon
    pub icon_markup: String,
    /// `<text>` element holding the brand name
    pub label_markup: String,
    /// `<style>` element embedding the label font
    pub font_face_markup: String,
    pub layout: Layout,
    pub placement: Placement,
    /// Measured icon bounds, before scaling. `None` when the icon could not
    /// be measured and the default extent was assumed.
    pub icon_bounds: Option<BBox>,
}

impl Composition {
    /// Font face, icon and label, in that order.
    pub fn concat(&self) -> String {
        let mut out = String::with_capacity(
            self.font_face_markup.len() + self.icon_markup.len() + self.label_markup.len(),
        );
        out.push_str(&self.font_face_markup);
        out.push_str(&self.icon_markup);
        out.push_str(&self.label_markup);
        out
    }
}

/// Builds [`Composition`]s from provider output, a brand name and a font.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    params: LayoutParams,
    options: ComposeOptions,
}

impl Composer {
    pub fn new(params: LayoutParams, options: ComposeOptions) -> Self {
        Self { params, options }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Compose a wordmark. Never fails: odd input gives odd but well-formed
    /// label and font markup, and the icon fragment is passed through as is.
    pub fn compose(&self, raw_icon: &str, brand_name: &str, font: &FontFace) -> Composition {
        let icon = sanitize_icon(raw_icon);
        let layout = self.params.for_brand(brand_name);
        debug!(
            brand_len = brand_name.chars().count(),
            font_size = layout.font_size,
            icon_scale = layout.icon_scale,
            translate_offset = layout.translate_offset,
            "computed layout"
        );

        let icon_bounds = match measure_fragment(&icon, self.params.icon_extent) {
            Ok(Some(bounds)) => {
                debug!(?bounds, "measured icon");
                Some(bounds)
            }
            Ok(None) => {
                debug!("icon draws nothing measurable, assuming default extent");
                None
            }
            Err(err) => {
                warn!(%err, "could not measure icon, assuming default extent");
                None
            }
        };

        let placement = self.place_label(&layout, icon_bounds.as_ref());

        Composition {
            icon_markup: self.icon_markup(&icon, &layout),
            label_markup: self.label_markup(brand_name, font, &layout, &placement),
            font_face_markup: font.to_markup(),
            layout,
            placement,
            icon_bounds,
        }
    }

    fn num(&self, n: f64) -> String {
        format_number(n, self.options.precision)
    }

    fn icon_markup(&self, icon: &str, layout: &Layout) -> String {
        let offset = self.num(layout.translate_offset);
        format!(
            r#"<g id="{}" transform="translate({}, {}) scale({})">{}</g>"#,
            ICON_GROUP_ID,
            offset,
            offset,
            self.num(layout.icon_scale),
            icon
        )
    }

    /// The label starts `label_gap` right of the scaled icon and is centered
    /// on the icon vertically.
    fn place_label(&self, layout: &Layout, bounds: Option<&BBox>) -> Placement {
        let extent = self.params.icon_extent;
        let (right, center_y) = match bounds {
            Some(b) => (b.max_x, b.center_y()),
            None => (extent, extent / 2.0),
        };

        Placement {
            label_x: layout.translate_offset + right * layout.icon_scale + self.params.label_gap,
            label_y: layout.translate_offset + center_y * layout.icon_scale,
        }
    }

    fn label_markup(
        &self,
        brand_name: &str,
        font: &FontFace,
        layout: &Layout,
        placement: &Placement,
    ) -> String {
        let style = format!(
            "font-family: {}, sans-serif; font-size: {}px; fill: {};",
            css_string(&font.name),
            self.num(layout.font_size),
            self.options.label_fill
        );

        let text = Element::new("text")
            .with_attr("x", self.num(placement.label_x))
            .with_attr("y", self.num(placement.label_y))
            .with_attr("dominant-baseline", "middle")
            .with_attr("text-anchor", "start")
            .with_attr("style", style)
            .with_text(brand_name);

        element_to_string(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_fragment, parse_svg};

    const ICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1024 1024"><rect x="100" y="200" width="800" height="600"/></svg>"#;

    fn font() -> FontFace {
        FontFace::new("Roboto", "AAAA")
    }

    #[test]
    fn test_acme() {
        let c = Composer::default().compose(ICON, "Acme", &font());

        assert_eq!(c.layout.font_size, 65.0);
        assert_eq!(
            c.icon_markup,
            r#"<g id="icon" transform="translate(7, 7) scale(.0388)"><rect x="100" y="200" width="800" height="600"/></g>"#
        );
        assert!(c.label_markup.contains("font-size: 65px;"));
        assert!(c.label_markup.contains("font-family: 'Roboto', sans-serif;"));
        assert!(c.label_markup.ends_with(">Acme</text>"));
        assert!(c.font_face_markup.starts_with("<style"));
    }

    #[test]
    fn test_label_placed_from_measured_icon() {
        let c = Composer::default().compose(ICON, "Acme", &font());
        let bounds = c.icon_bounds.unwrap();
        assert_eq!(bounds.max_x, 900.0);
        assert_eq!(bounds.center_y(), 500.0);

        // 7 + 900 * 0.0388 + 40, 7 + 500 * 0.0388
        assert!((c.placement.label_x - 81.92).abs() < 1e-9);
        assert!((c.placement.label_y - 26.4).abs() < 1e-9);
        assert!(c.label_markup.contains(r#"x="81.92""#));
        assert!(c.label_markup.contains(r#"y="26.4""#));
    }

    #[test]
    fn test_label_follows_referenced_shapes() {
        let icon = r##"<svg xmlns="http://www.w3.org/2000/svg"><defs><path id="p" d="M0 0 H300 V300 H0 Z"/></defs><use href="#p" x="100"/></svg>"##;
        let c = Composer::default().compose(icon, "Acme", &font());
        assert!((c.icon_bounds.unwrap().max_x - 400.0).abs() < 0.01);
        // 7 + 400 * 0.0388 + 40
        assert!((c.placement.label_x - 62.52).abs() < 0.001);
    }

    #[test]
    fn test_label_clears_wide_strokes() {
        let icon = r#"<line x1="100" y1="500" x2="600" y2="500" stroke="black" stroke-width="400"/>"#;
        let c = Composer::default().compose(icon, "Acme", &font());
        let bounds = c.icon_bounds.unwrap();
        assert!((bounds.min_y - 300.0).abs() < 0.01);
        assert!((bounds.max_y - 700.0).abs() < 0.01);
    }

    #[test]
    fn test_unmeasurable_icon_uses_default_extent() {
        let params = LayoutParams::default();
        let layout = params.compute(4);
        for icon in ["not markup <", "<g></g>", r#"<path d="M0 0 Q"/>"#] {
            let c = Composer::default().compose(icon, "Acme", &font());
            assert_eq!(c.icon_bounds, None, "icon: {icon}");
            let expected_x = layout.translate_offset + 1024.0 * layout.icon_scale + 40.0;
            assert!((c.placement.label_x - expected_x).abs() < 1e-9);
            // The icon is still passed through untouched
            assert!(c.icon_markup.contains(icon));
        }
    }

    #[test]
    fn test_empty_brand_name() {
        let c = Composer::default().compose(ICON, "", &font());
        let root = parse_fragment(&c.label_markup).unwrap();
        let text = root.child_elements().next().unwrap();
        assert!(text.is("text"));
        assert_eq!(text.text_content(), "");
        assert!(c.label_markup.ends_with("></text>"));

        let size = format!("font-size: {}px;", format_number(LayoutParams::default().compute(0).font_size, 4));
        assert_eq!(size, "font-size: 76px;");
        assert!(text.get_attr("style").unwrap().contains(&size));
    }

    #[test]
    fn test_empty_font_name() {
        let c = Composer::default().compose(ICON, "Acme", &FontFace::new("", ""));
        assert!(c.font_face_markup.contains("font-family: '';"));
        assert!(c.label_markup.contains("font-family: '', sans-serif;"));
    }

    #[test]
    fn test_brand_name_is_escaped() {
        let brand = r#"Q&A <"Co">"#;
        let c = Composer::default().compose(ICON, brand, &font());
        assert!(c.label_markup.contains("Q&amp;A &lt;\"Co\"&gt;"));

        let root = parse_fragment(&c.label_markup).unwrap();
        assert_eq!(root.child_elements().next().unwrap().text_content(), brand);
    }

    #[test]
    fn test_font_name_is_escaped_in_style_attr() {
        let c = Composer::default().compose(ICON, "Acme", &FontFace::new("A\"B'C", "AAAA"));
        let root = parse_fragment(&c.label_markup).unwrap();
        let style = root.child_elements().next().unwrap().get_attr("style").unwrap().to_string();
        assert!(style.starts_with(r#"font-family: 'A"B\'C', sans-serif;"#));
    }

    #[test]
    fn test_fragments_embed_in_any_wrapper() {
        let c = Composer::default().compose(ICON, "Acme", &font());
        for (w, h) in [(500, 200), (500, 100), (64, 64)] {
            let svg = format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{}</svg>"#,
                c.concat()
            );
            let doc = parse_svg(&svg).unwrap();
            assert!(doc.find_by_id(ICON_GROUP_ID).is_some());
            let names: Vec<_> = doc.root.child_elements().map(|e| e.name.local.clone()).collect();
            assert_eq!(names, ["style", "g", "text"]);
        }
    }

    #[test]
    fn test_scale_and_font_shrink_with_length() {
        let composer = Composer::default();
        let short = composer.compose(ICON, "Ab", &font());
        let long = composer.compose(ICON, "Abcdefghijklmnop", &font());
        assert!(long.layout.font_size < short.layout.font_size);
        assert!(long.layout.icon_scale < short.layout.icon_scale);
        assert!(long.layout.translate_offset > short.layout.translate_offset);
    }

    #[test]
    fn test_custom_options() {
        let composer = Composer::new(
            LayoutParams::default(),
            ComposeOptions {
                precision: 1,
                label_fill: "#123456".into(),
            },
        );
        let c = composer.compose(ICON, "Acme", &font());
        assert!(c.icon_markup.contains("scale(0)") || c.icon_markup.contains("scale(.0)"));
        assert!(c.label_markup.contains("fill: #123456;"));
    }

    #[test]
    fn test_composition_serializes_camel_case() {
        let c = Composer::default().compose(ICON, "Acme", &font());
        let json = serde_json::to_value(&c).unwrap();
        assert!(json["iconMarkup"].is_string());
        assert!(json["labelMarkup"].is_string());
        assert!(json["fontFaceMarkup"].is_string());
        assert_eq!(json["layout"]["fontSize"], 65.0);
        assert_eq!(json["iconBounds"]["maxX"], 900.0);
    }
}
