use std::path::PathBuf;

use thiserror::Error;

use crate::registry::FontStyle;

#[derive(Debug, Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("SVG error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Failed to read font file: {path}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("No fonts registered for style '{0}' or its fallback")]
    NoFonts(FontStyle),
}

pub type Result<T> = std::result::Result<T, Error>;
