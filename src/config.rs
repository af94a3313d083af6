//! `wordmark.toml` configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::compose::{ComposeOptions, Composer};
use crate::error::{Error, Result};
use crate::layout::LayoutParams;
use crate::registry::{DiskFontSource, FontRegistry, RegistryConfig};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "wordmark.toml";

/// Highest supported number precision.
pub const MAX_PRECISION: u8 = 10;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutParams,
    pub compose: ComposeOptions,
    pub fonts: RegistryConfig,
}

impl Config {
    /// Read, parse and validate a config file. A relative `fonts.root` is
    /// resolved against the file's directory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let mut config: Config = toml::from_str(&content)?;

        let base = path.parent().unwrap_or(Path::new(""));
        config.fonts.root = Some(match config.fonts.root.take() {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => base.to_path_buf(),
        });

        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Check the values make sense together.
    ///
    /// # Errors
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        let numbers = [
            ("base_font_size", l.base_font_size),
            ("font_decay_rate", l.font_decay_rate),
            ("base_scale", l.base_scale),
            ("scale_decay_rate", l.scale_decay_rate),
            ("base_offset", l.base_offset),
            ("offset_growth_rate", l.offset_growth_rate),
            ("label_gap", l.label_gap),
            ("icon_extent", l.icon_extent),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(Error::Config(format!("layout.{name} must be finite")));
            }
        }

        for (name, value) in [
            ("font_decay_rate", l.font_decay_rate),
            ("scale_decay_rate", l.scale_decay_rate),
            ("offset_growth_rate", l.offset_growth_rate),
        ] {
            if value < 0.0 {
                return Err(Error::Config(format!(
                    "layout.{name} must not be negative, got {value}"
                )));
            }
        }

        if l.icon_extent <= 0.0 {
            return Err(Error::Config(format!(
                "layout.icon_extent must be positive, got {}",
                l.icon_extent
            )));
        }

        for (name, floor) in [
            ("min_font_size", l.min_font_size),
            ("min_icon_scale", l.min_icon_scale),
        ] {
            if floor.is_some_and(|v| !v.is_finite()) {
                return Err(Error::Config(format!("layout.{name} must be finite")));
            }
        }

        if self.compose.precision > MAX_PRECISION {
            return Err(Error::Config(format!(
                "compose.precision must be at most {MAX_PRECISION}, got {}",
                self.compose.precision
            )));
        }

        let fill = &self.compose.label_fill;
        if fill.trim().is_empty()
            || fill
                .chars()
                .any(|c| matches!(c, ';' | '{' | '}') || c.is_control())
        {
            return Err(Error::Config(format!(
                "compose.label_fill must be a single CSS color, got {fill:?}"
            )));
        }

        self.fonts.validate()
    }

    pub fn composer(&self) -> Composer {
        Composer::new(self.layout.clone(), self.compose.clone())
    }

    /// Build the font registry.
    ///
    /// # Errors
    /// Returns [`Error::NoFonts`] if no fonts are configured for the
    /// fallback style.
    pub fn registry(&self) -> Result<FontRegistry> {
        FontRegistry::from_config(&self.fonts)
    }

    /// Reads fonts from `fonts.root`, or the working directory.
    pub fn font_source(&self) -> DiskFontSource {
        DiskFontSource::new(self.fonts.root.clone().unwrap_or_else(|| PathBuf::from(".")))
    }
}

impl FromStr for Config {
    type Err = Error;

    /// Parse and validate TOML. Paths are left as written.
    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
