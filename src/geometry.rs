//! Measuring the drawn extent of an icon fragment.
//!
//! The fragment is placed in a square `<svg>` viewport and handed to `usvg`,
//! which resolves `<use>` references, units, styles and nested viewports.
//! The result is the stroke-inclusive box of everything that renders.

use serde::Serialize;
use usvg::{Rect, Tree};

use crate::error::Result;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center_y(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl From<Rect> for BBox {
    fn from(rect: Rect) -> Self {
        Self {
            min_x: rect.left() as f64,
            min_y: rect.top() as f64,
            max_x: rect.right() as f64,
            max_y: rect.bottom() as f64,
        }
    }
}

/// Measure a sanitized icon fragment inside an `extent` x `extent` viewport.
///
/// Percentages resolve against `extent`. Returns `Ok(None)` when nothing
/// renders.
///
/// # Errors
/// Returns [`crate::Error::Svg`] if the fragment is not well-formed.
pub fn measure_fragment(fragment: &str, extent: f64) -> Result<Option<BBox>> {
    let svg = format!(
        r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}" width="{extent}" height="{extent}" viewBox="0 0 {extent} {extent}">{fragment}</svg>"#
    );
    let tree = Tree::from_str(&svg, &usvg::Options::default())?;
    Ok(stroke_bounds(&tree))
}

/// Union of the stroke bounding boxes of the top-level nodes. The viewport
/// maps one-to-one onto user space, so canvas coordinates are icon units.
fn stroke_bounds(tree: &Tree) -> Option<BBox> {
    tree.root()
        .children()
        .iter()
        .map(|node| BBox::from(node.abs_stroke_bounding_box()))
        .reduce(|acc, b| acc.union(&b))
}
