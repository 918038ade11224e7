//! Fenced-code language tags.

use serde::Serialize;

/// Info-string tag reserved for diagram descriptions.
pub const DIAGRAM_TAG: &str = "mermaid";

/// Presentation strategy for one code block, decided from its info string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "tag", rename_all = "snake_case")]
pub enum CodeLanguage {
    /// Routed to the diagram renderer.
    Diagram,
    /// Syntax highlighted with the grammar selected by the tag.
    Highlight(String),
    /// Rendered as undecorated text.
    Plain,
}

impl CodeLanguage {
    /// Decides the strategy for a fenced block's info string.
    ///
    /// Only the first whitespace-separated word is the tag; anything after
    /// it (`rust title="x"`) is ignored. A tag with characters outside
    /// `[A-Za-z0-9_+#.-]` is malformed and falls back to [`Self::Plain`].
    #[must_use]
    pub fn from_info(info: &str) -> Self {
        let Some(tag) = info.split_whitespace().next() else {
            return Self::Plain;
        };

        if tag.eq_ignore_ascii_case(DIAGRAM_TAG) {
            Self::Diagram
        } else if tag.chars().all(is_tag_char) {
            Self::Highlight(tag.to_string())
        } else {
            Self::Plain
        }
    }

    /// Short name used in outlines and logs.
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Diagram => "diagram",
            Self::Highlight(_) => "highlight",
            Self::Plain => "plain",
        }
    }
}

const fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '.' | '-')
}
