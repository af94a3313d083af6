//! Font registry: which fonts may label a logo of a given style.
//!
//! The registry is plain configuration. Each [`FontStyle`] maps to a list of
//! candidate fonts; one is picked uniformly at random per logo. A style with
//! no fonts uses the registry's `fallback` style instead. The random source
//! is passed in, so a seeded or stepping RNG gives reproducible picks.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::font::{FontFace, FontFormat};

/// The style a user picks for their logo.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Calm,
    Playful,
    Elegant,
    Professional,
    Energetic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 5] = [
        FontStyle::Calm,
        FontStyle::Playful,
        FontStyle::Elegant,
        FontStyle::Professional,
        FontStyle::Energetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Playful => "playful",
            Self::Elegant => "elegant",
            Self::Professional => "professional",
            Self::Energetic => "energetic",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown style '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// One registered font file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    /// Family name written into `font-family`
    pub name: String,
    /// Font file, relative to the registry root
    pub path: PathBuf,
    /// Overrides the format guessed from the file extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FontFormat>,
}

impl FontEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            format: None,
        }
    }

    pub fn format(&self) -> FontFormat {
        self.format.unwrap_or_else(|| {
            self.path
                .extension()
                .and_then(|e| e.to_str())
                .map(FontFormat::from_extension)
                .unwrap_or_default()
        })
    }
}

/// `[fonts]` section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory font paths are resolved against
    pub root: Option<PathBuf>,
    /// Style used when the requested style has no fonts
    pub fallback: FontStyle,
    #[serde(deserialize_with = "deserialize_styles")]
    pub styles: BTreeMap<FontStyle, Vec<FontEntry>>,
}

/// Table keys arrive as strings; parse them so typos are reported by name.
fn deserialize_styles<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<FontStyle, Vec<FontEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, Vec<FontEntry>>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, fonts)| {
            key.parse::<FontStyle>()
                .map(|style| (style, fonts))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

impl RegistryConfig {
    /// Check entries are complete. An empty registry is valid (callers can
    /// still pass an explicit font); a non-empty one needs fonts for its
    /// fallback style.
    pub fn validate(&self) -> Result<()> {
        for (style, entries) in &self.styles {
            for entry in entries {
                if entry.name.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "font in style '{}' has an empty name",
                        style
                    )));
                }
                if entry.path.as_os_str().is_empty() {
                    return Err(Error::Config(format!(
                        "font '{}' in style '{}' has an empty path",
                        entry.name, style
                    )));
                }
            }
        }

        let has_fonts = self.styles.values().any(|v| !v.is_empty());
        let fallback_empty = self
            .styles
            .get(&self.fallback)
            .is_none_or(|v| v.is_empty());
        if has_fonts && fallback_empty {
            return Err(Error::Config(format!(
                "fallback style '{}' has no fonts",
                self.fallback
            )));
        }

        Ok(())
    }
}

/// Where font bytes come from.
pub trait FontSource {
    /// Read the font file at `path` (as written in the registry).
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_font(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Reads fonts from disk, relative to a root directory.
#[derive(Debug, Clone, Default)]
pub struct DiskFontSource {
    pub root: PathBuf,
}

impl DiskFontSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FontSource for DiskFontSource {
    fn read_font(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|source| Error::FontRead { path: full, source })
    }
}

/// In-memory font files, keyed by registry path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFontSource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFontSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), bytes.into());
        self
    }
}

impl FontSource for MemoryFontSource {
    fn read_font(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| Error::FontRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory source"),
        })
    }
}

/// Validated font registry.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    styles: BTreeMap<FontStyle, Vec<FontEntry>>,
    fallback: FontStyle,
}

impl FontRegistry {
    /// Build a registry. Fails if the fallback style has no fonts.
    pub fn new(styles: BTreeMap<FontStyle, Vec<FontEntry>>, fallback: FontStyle) -> Result<Self> {
        let config = RegistryConfig {
            root: None,
            fallback,
            styles,
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        if config.styles.get(&config.fallback).is_none_or(|v| v.is_empty()) {
            return Err(Error::NoFonts(config.fallback));
        }
        Ok(Self {
            styles: config.styles.clone(),
            fallback: config.fallback,
        })
    }

    pub fn fallback(&self) -> FontStyle {
        self.fallback
    }

    /// Fonts registered directly under `style` (no fallback).
    pub fn fonts(&self, style: FontStyle) -> &[FontEntry] {
        self.styles.get(&style).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pick a font for `style`, falling back when it has none.
    pub fn choose<R: Rng + ?Sized>(&self, style: FontStyle, rng: &mut R) -> Result<&FontEntry> {
        let mut candidates = self.fonts(style);
        if candidates.is_empty() {
            debug!(%style, fallback = %self.fallback, "no fonts for style, using fallback");
            candidates = self.fonts(self.fallback);
        }
        candidates.choose(rng).ok_or(Error::NoFonts(style))
    }

    /// Pick a font for `style` and load it into an embeddable face.
    pub fn resolve<R, S>(&self, style: FontStyle, rng: &mut R, source: &S) -> Result<FontFace>
    where
        R: Rng + ?Sized,
        S: FontSource + ?Sized,
    {
        let entry = self.choose(style, rng)?;
        let bytes = source.read_font(&entry.path)?;
        info!(%style, font = %entry.name, bytes = bytes.len(), "selected font");
        Ok(FontFace::from_bytes(&entry.name, &bytes, entry.format()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn registry() -> FontRegistry {
        let mut styles = BTreeMap::new();
        styles.insert(
            FontStyle::Calm,
            vec![
                FontEntry::new("Quicksand", "calm/Quicksand.ttf"),
                FontEntry::new("Nunito", "calm/Nunito.woff2"),
            ],
        );
        styles.insert(
            FontStyle::Elegant,
            vec![FontEntry::new("Playfair", "elegant/Playfair.otf")],
        );
        styles.insert(FontStyle::Energetic, Vec::new());
        FontRegistry::new(styles, FontStyle::Calm).unwrap()
    }

    #[test]
    fn test_style_parse_and_display() {
        assert_eq!("Elegant".parse::<FontStyle>().unwrap(), FontStyle::Elegant);
        assert_eq!(" calm ".parse::<FontStyle>().unwrap(), FontStyle::Calm);
        assert!("grumpy".parse::<FontStyle>().unwrap_err().contains("professional"));
        assert_eq!(FontStyle::Professional.to_string(), "professional");
    }

    #[test]
    fn test_choose_from_own_style() {
        let reg = registry();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(reg.choose(FontStyle::Elegant, &mut rng).unwrap().name, "Playfair");
    }

    #[test]
    fn test_fallback_for_missing_and_empty_styles() {
        let reg = registry();
        let mut rng = StepRng::new(0, 0);
        for style in [FontStyle::Playful, FontStyle::Energetic, FontStyle::Professional] {
            let entry = reg.choose(style, &mut rng).unwrap();
            assert_eq!(entry.name, "Quicksand", "style {style}");
        }
    }

    #[test]
    fn test_step_rng_picks_ends() {
        let reg = registry();
        assert_eq!(
            reg.choose(FontStyle::Calm, &mut StepRng::new(0, 0)).unwrap().name,
            "Quicksand"
        );
        assert_eq!(
            reg.choose(FontStyle::Calm, &mut StepRng::new(1 << 31, 0))
                .unwrap()
                .name,
            "Nunito"
        );
    }

    #[test]
    fn test_seeded_choice_is_reproducible() {
        let reg = registry();
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..16)
                .map(|_| reg.choose(FontStyle::Calm, &mut rng).unwrap().name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
        // Both fonts show up over a few draws
        let all = picks(7);
        assert!(all.iter().any(|n| n == "Quicksand"));
        assert!(all.iter().any(|n| n == "Nunito"));
    }

    #[test]
    fn test_resolve_reads_and_encodes() {
        let reg = registry();
        let source = MemoryFontSource::new().with_file("elegant/Playfair.otf", b"otf!".to_vec());
        let face = reg
            .resolve(FontStyle::Elegant, &mut StepRng::new(0, 0), &source)
            .unwrap();
        assert_eq!(face.name, "Playfair");
        assert_eq!(face.base64_payload, "b3RmIQ==");
        assert_eq!(face.format, FontFormat::OpenType);
    }

    #[test]
    fn test_resolve_missing_file() {
        let reg = registry();
        let err = reg
            .resolve(FontStyle::Elegant, &mut StepRng::new(0, 0), &MemoryFontSource::new())
            .unwrap_err();
        assert!(matches!(err, Error::FontRead { .. }));
    }

    #[test]
    fn test_disk_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ttf"), b"ttf").unwrap();
        let source = DiskFontSource::new(dir.path());
        assert_eq!(source.read_font(Path::new("a.ttf")).unwrap(), b"ttf");
        assert!(source.read_font(Path::new("missing.ttf")).is_err());
    }

    #[test]
    fn test_fallback_without_fonts_is_rejected() {
        let mut styles = BTreeMap::new();
        styles.insert(FontStyle::Elegant, vec![FontEntry::new("Playfair", "p.otf")]);
        assert!(matches!(
            FontRegistry::new(styles.clone(), FontStyle::Calm),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            FontRegistry::new(BTreeMap::new(), FontStyle::Calm),
            Err(Error::NoFonts(FontStyle::Calm))
        ));
        assert!(FontRegistry::new(styles, FontStyle::Elegant).is_ok());
    }

    #[test]
    fn test_placeholder_entries_are_rejected() {
        let config = RegistryConfig {
            styles: BTreeMap::from([(FontStyle::Calm, vec![FontEntry::new("", "")])]),
            ..RegistryConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_format_override() {
        let mut entry = FontEntry::new("X", "fonts/x.bin");
        assert_eq!(entry.format(), FontFormat::TrueType);
        entry.format = Some(FontFormat::Woff);
        assert_eq!(entry.format(), FontFormat::Woff);
    }
}
