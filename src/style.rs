// src/style.rs
//! Visual identity of generated content.
//!
//! Colors, font and sizes are bundled in a config struct so a tenant can
//! override the defaults from a YAML file; every field falls back to the
//! house style when omitted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::RunStyle;

/// Bullet glyph followed by two no-break spaces, matching the house layout.
pub const BULLET: &str = "•\u{a0}\u{a0}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Accent color for labels and styled scalars, RRGGBB hex.
    pub accent_color: String,
    /// Fill of experience header cells.
    pub header_fill: String,
    /// Text color inside experience header cells.
    pub header_text_color: String,
    pub font: String,
    /// Sizes in half-points.
    pub label_size: u32,
    pub body_size: u32,
    pub scalar_size: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            accent_color: "1F4E79".to_string(),
            header_fill: "B8860B".to_string(),
            header_text_color: "FFFFFF".to_string(),
            font: "Calibri".to_string(),
            label_size: 20,
            body_size: 18,
            scalar_size: 24,
        }
    }
}

impl StyleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read style config: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid style config: {}", path.display()))
    }

    /// Bold accent at 12 pt, for the consultant name and job title.
    pub fn scalar(&self) -> RunStyle {
        RunStyle {
            bold: true,
            color: Some(self.accent_color.clone()),
            size: Some(self.scalar_size),
            font: Some(self.font.clone()),
            ..Default::default()
        }
    }

    /// Bold accent label cell text.
    pub fn label(&self) -> RunStyle {
        RunStyle {
            bold: true,
            color: Some(self.accent_color.clone()),
            size: Some(self.label_size),
            font: Some(self.font.clone()),
            ..Default::default()
        }
    }

    /// Regular accent content cell text.
    pub fn content(&self) -> RunStyle {
        RunStyle {
            color: Some(self.accent_color.clone()),
            size: Some(self.body_size),
            font: Some(self.font.clone()),
            ..Default::default()
        }
    }

    /// White bold text on the experience header fill.
    pub fn header(&self) -> RunStyle {
        RunStyle {
            bold: true,
            color: Some(self.header_text_color.clone()),
            size: Some(self.label_size),
            font: Some(self.font.clone()),
            ..Default::default()
        }
    }

    /// The bullet glyph itself, bold accent.
    pub fn bullet_glyph(&self) -> RunStyle {
        RunStyle {
            bold: true,
            color: Some(self.accent_color.clone()),
            size: Some(self.label_size),
            font: Some(self.font.clone()),
            ..Default::default()
        }
    }

    /// Bullet body text, accent but normal weight.
    pub fn bullet_text(&self) -> RunStyle {
        RunStyle {
            color: Some(self.accent_color.clone()),
            size: Some(self.label_size),
            font: Some(self.font.clone()),
            ..Default::default()
        }
    }

    /// Achievement lines inside experience blocks, default (black) 9 pt.
    pub fn achievement(&self) -> RunStyle {
        RunStyle {
            size: Some(self.body_size),
            ..Default::default()
        }
    }

    /// Underlined label, used for the environment line.
    pub fn underlined_label(&self) -> RunStyle {
        RunStyle {
            underline: true,
            ..self.label()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_house_style() {
        let style = StyleConfig::default();
        assert_eq!(style.accent_color, "1F4E79");
        assert_eq!(style.header_fill, "B8860B");
        assert_eq!(style.scalar_size, 24);
    }

    #[test]
    fn test_partial_yaml_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "accent_color: \"2B579A\"").unwrap();
        let style = StyleConfig::load(file.path()).unwrap();
        assert_eq!(style.accent_color, "2B579A");
        assert_eq!(style.header_fill, "B8860B");
        assert_eq!(style.font, "Calibri");
    }

    #[test]
    fn test_scalar_style_is_bold_accent() {
        let style = StyleConfig::default();
        let run = style.scalar();
        assert!(run.bold);
        assert_eq!(run.color.as_deref(), Some("1F4E79"));
        assert_eq!(run.size, Some(24));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(StyleConfig::load(Path::new("/nonexistent/style.yaml")).is_err());
    }
}
