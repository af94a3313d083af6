//! Prompt text for the icon generation request.

use crate::registry::FontStyle;

impl FontStyle {
    /// One sentence steering the stroke weight of the generated icon.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::Playful => "The playful style has thicker strokes and a more whimsical design.",
            Self::Elegant => "The elegant style has thinner strokes and a more minimal design.",
            Self::Professional => {
                "The professional style has medium strokes and a more formal design."
            }
            Self::Calm => "The calm style has thin strokes and a more minimal design.",
            Self::Energetic => "The energetic style has bold strokes and a more dynamic design.",
        }
    }
}

/// Build the prompt sent to the image provider for an icon.
pub fn build_prompt(icon_description: &str, style: FontStyle) -> String {
    format!(
        "Generate a {} icon with black strokes and a {} style. {}",
        icon_description.trim(),
        style,
        style.prompt_hint()
    )
}
