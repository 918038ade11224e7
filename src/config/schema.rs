//! Deck configuration schema.
//!
//! These types are deserialized from the deck YAML file. Unknown keys are
//! rejected everywhere so typos surface at load time.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::diagram::DiagramTheme;
use crate::page::PageMetadata;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root of a deck file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckConfig {
    /// Document title and description
    pub metadata: PageMetadata,

    /// Stylesheet href linked from the page head
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,

    /// Diagram colors; defaults apply to missing keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<DiagramTheme>,

    /// Name of a built-in syntax highlighting theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_theme: Option<String>,

    /// Slides in presentation order
    #[serde(default)]
    pub slides: Vec<SlideConfig>,
}

// ============================================================================
// Slides
// ============================================================================

/// One slide entry, discriminated by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SlideConfig {
    /// Opening title card
    Title {
        /// Main title
        title: String,
        /// Line under the title
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        /// Presenter name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        presenter: Option<String>,
        /// Date of the talk (`YYYY-MM-DD`)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<NaiveDate>,
    },

    /// Title plus markdown body
    Markdown {
        /// Slide heading
        title: String,
        /// Inline markdown body
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        /// Markdown file, relative to the deck file
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body_file: Option<PathBuf>,
    },
}

impl SlideConfig {
    /// The slide's title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Title { title, .. } | Self::Markdown { title, .. } => title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_deck() {
        let yaml = r##"
metadata:
  title: "Rust in Production"
  description: "Webinar"
stylesheet: deck.css
theme:
  primary_color: "#000000"
highlight_theme: InspiredGitHub
slides:
  - kind: title
    title: Rust in Production
    presenter: Sam
    date: 2024-03-07
  - kind: markdown
    title: Pipeline
    body: |
      - build
  - kind: markdown
    title: Notes
    body_file: notes.md
"##;
        let deck: DeckConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(deck.metadata.title, "Rust in Production");
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.theme.unwrap().primary_color, "#000000");
        match &deck.slides[0] {
            SlideConfig::Title { date, .. } => {
                assert_eq!(*date, NaiveDate::from_ymd_opt(2024, 3, 7));
            }
            SlideConfig::Markdown { .. } => panic!("expected title slide"),
        }
        assert!(matches!(
            &deck.slides[2],
            SlideConfig::Markdown { body_file: Some(p), .. } if p == &PathBuf::from("notes.md")
        ));
    }

    #[test]
    fn test_unknown_slide_kind_rejected() {
        let yaml = "metadata: {title: t}\nslides:\n  - kind: video\n    title: x\n";
        assert!(serde_yaml::from_str::<DeckConfig>(yaml).is_err());
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let yaml = "metadata: {title: t}\nslide: []\n";
        assert!(serde_yaml::from_str::<DeckConfig>(yaml).is_err());
    }

    #[test]
    fn test_slide_title_accessor() {
        let slide = SlideConfig::Markdown {
            title: "Why".to_string(),
            body: None,
            body_file: None,
        };
        assert_eq!(slide.title(), "Why");
    }
}
