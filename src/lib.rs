//! wordmark - compose a generated icon and a brand name into an SVG logo.
//!
//! The provider's icon is sanitized into an embeddable fragment, scaled next
//! to the brand name, and the label font is embedded as an `@font-face`
//! rule, so the logo renders identically anywhere.
//!
//! ```
//! use wordmark::{Canvas, FontFace, compose_logo};
//!
//! let icon = r#"<svg xmlns="http://www.w3.org/2000/svg"><circle cx="512" cy="512" r="400"/></svg>"#;
//! let logo = compose_logo(icon, "Acme", &FontFace::new("Roboto", "AAAA"));
//! assert_eq!(logo.layout.font_size, 65.0);
//!
//! let svg = Canvas::new(500.0, 200.0).wrap(&logo);
//! assert!(svg.contains(">Acme</text>"));
//! ```

mod ast;
mod canvas;
mod compose;
mod config;
mod error;
mod font;
mod geometry;
mod layout;
mod markup;
mod parse;
mod prompt;
mod registry;
mod sanitize;

pub use ast::*;
pub use canvas::*;
pub use compose::*;
pub use config::*;
pub use error::*;
pub use font::*;
pub use geometry::*;
pub use layout::*;
pub use markup::*;
pub use parse::*;
pub use prompt::*;
pub use registry::*;
pub use sanitize::*;

/// Compose a logo with default layout and output settings.
pub fn compose_logo(raw_icon: &str, brand_name: &str, font: &FontFace) -> Composition {
    Composer::default().compose(raw_icon, brand_name, font)
}
