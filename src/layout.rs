//! Layout parameters derived from the length of the brand name.
//!
//! Longer names get a smaller label font and a smaller icon so the wordmark
//! keeps roughly the same proportions. All three values are linear in the
//! name length:
//!
//! ```text
//! font_size        = base_font_size - font_decay_rate    * n
//! icon_scale       = base_scale     - scale_decay_rate   * n
//! translate_offset = base_offset    + offset_growth_rate * n
//! ```

use serde::{Deserialize, Serialize};

/// Tunable constants for the layout calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Label font size (px) for an empty name
    pub base_font_size: f64,
    /// Font size lost per character
    pub font_decay_rate: f64,
    /// Icon scale for an empty name
    pub base_scale: f64,
    /// Icon scale lost per character
    pub scale_decay_rate: f64,
    /// Icon translation for an empty name
    pub base_offset: f64,
    /// Icon translation gained per character
    pub offset_growth_rate: f64,
    /// Optional lower bound for the font size. Unset by default, so very
    /// long names can reach zero or negative sizes.
    pub min_font_size: Option<f64>,
    /// Optional lower bound for the icon scale
    pub min_icon_scale: Option<f64>,
    /// Horizontal space between the icon's right edge and the label
    pub label_gap: f64,
    /// Side of the square assumed for icons that cannot be measured, in
    /// icon units (providers render onto a 1024x1024 canvas)
    pub icon_extent: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            base_font_size: 76.0,
            font_decay_rate: 2.75,
            base_scale: 0.04,
            scale_decay_rate: 0.0003,
            base_offset: 6.0,
            offset_growth_rate: 0.25,
            min_font_size: None,
            min_icon_scale: None,
            label_gap: 40.0,
            icon_extent: 1024.0,
        }
    }
}

/// The computed layout for one brand name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub font_size: f64,
    pub icon_scale: f64,
    pub translate_offset: f64,
}

impl LayoutParams {
    /// Compute the layout for a name of `len` characters.
    pub fn compute(&self, len: usize) -> Layout {
        let n = len as f64;

        let mut font_size = self.base_font_size - self.font_decay_rate * n;
        if let Some(min) = self.min_font_size {
            font_size = font_size.max(min);
        }

        let mut icon_scale = self.base_scale - self.scale_decay_rate * n;
        if let Some(min) = self.min_icon_scale {
            icon_scale = icon_scale.max(min);
        }

        Layout {
            font_size,
            icon_scale,
            translate_offset: self.base_offset + self.offset_growth_rate * n,
        }
    }

    /// Compute the layout for a brand name, counting Unicode scalar values.
    pub fn for_brand(&self, brand_name: &str) -> Layout {
        self.compute(brand_name.chars().count())
    }
}
