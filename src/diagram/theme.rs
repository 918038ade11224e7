//! Diagram color theme.
//!
//! Supplied once per page when the renderer is built and read-only after.

use mermaid_rs_renderer::theme::Theme;
use serde::{Deserialize, Serialize};

/// Colors applied to every diagram on a page.
///
/// Exactly these five options are recognized; unknown keys in a deck file
/// are rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramTheme {
    /// Fill for regular nodes.
    pub primary_color: String,
    /// Secondary fill for accent shapes.
    pub secondary_color: String,
    /// Diagram canvas background.
    pub background: String,
    /// Label text color.
    pub text_color: String,
    /// Edge and node-border color.
    pub line_color: String,
}

impl Default for DiagramTheme {
    fn default() -> Self {
        Self {
            primary_color: "#667eea".to_string(),
            secondary_color: "#764ba2".to_string(),
            background: "#1a202c".to_string(),
            text_color: "#ffffff".to_string(),
            line_color: "#5a67d8".to_string(),
        }
    }
}

impl DiagramTheme {
    /// Engine theme carrying these colors; everything else keeps the
    /// engine's `modern` defaults.
    #[must_use]
    pub fn to_engine_theme(&self) -> Theme {
        Theme {
            background: self.background.clone(),
            primary_color: self.primary_color.clone(),
            secondary_color: self.secondary_color.clone(),
            primary_text_color: self.text_color.clone(),
            text_color: self.text_color.clone(),
            line_color: self.line_color.clone(),
            primary_border_color: self.line_color.clone(),
            edge_label_background: self.background.clone(),
            font_family: "sans-serif".to_string(),
            ..Theme::modern()
        }
    }

    /// Returns `(field, value)` for every color that is not a usable CSS
    /// color: a `#rgb`/`#rrggbb`/`#rrggbbaa` hex code or a bare color name.
    #[must_use]
    pub fn invalid_colors(&self) -> Vec<(&'static str, &str)> {
        [
            ("primary_color", self.primary_color.as_str()),
            ("secondary_color", self.secondary_color.as_str()),
            ("background", self.background.as_str()),
            ("text_color", self.text_color.as_str()),
            ("line_color", self.line_color.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !is_css_color(value))
        .collect()
    }
}

fn is_css_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
}
