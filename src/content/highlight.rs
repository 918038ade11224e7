//! Syntax highlighting with line numbers.
//!
//! Grammars and themes are the `syntect` defaults, loaded once per process.

use std::fmt::Write;
use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::escape::escape_xml;
use crate::error::ConfigError;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Theme used when the deck does not name one.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Names of every built-in highlight theme, sorted.
#[must_use]
pub fn theme_names() -> Vec<&'static str> {
    THEME_SET.themes.keys().map(String::as_str).collect()
}

/// Highlights fenced code for one page.
#[derive(Debug, Clone)]
pub struct Highlighter {
    theme_name: String,
    theme: &'static Theme,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME).unwrap_or_else(|_| Self {
            theme_name: String::new(),
            theme: &FALLBACK_THEME,
        })
    }
}

static FALLBACK_THEME: LazyLock<Theme> = LazyLock::new(Theme::default);

impl Highlighter {
    /// Creates a highlighter for a named built-in theme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when no theme has that name.
    pub fn new(theme_name: &str) -> Result<Self, ConfigError> {
        let theme = THEME_SET
            .themes
            .get(theme_name)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "highlight_theme".to_string(),
                value: theme_name.to_string(),
                expected: format!("one of: {}", theme_names().join(", ")),
            })?;

        Ok(Self {
            theme_name: theme_name.to_string(),
            theme,
        })
    }

    /// Name of the active theme.
    #[must_use]
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Highlights `code` with the grammar selected by `tag`.
    ///
    /// Returns `None` when no grammar matches or highlighting fails, in
    /// which case the caller renders the block as plain text.
    #[must_use]
    pub fn highlight(&self, tag: &str, code: &str) -> Option<String> {
        let Some(syntax) = SYNTAX_SET.find_syntax_by_token(tag) else {
            tracing::debug!(
                language = tag,
                closest = closest_syntax(tag).unwrap_or("-"),
                "no grammar for code block language, rendering plain"
            );
            return None;
        };

        let mut highlighter = HighlightLines::new(syntax, self.theme);
        let mut html = String::with_capacity(code.len() * 4);
        let background = self.theme.settings.background.map(css_color);
        let style = background.map_or_else(String::new, |bg| format!(" style=\"background-color:{bg};\""));

        let _ = write!(
            html,
            "<pre class=\"code-block highlighted\" data-language=\"{}\"{style}><code>",
            escape_xml(tag)
        );

        for (number, line) in LinesWithEndings::from(code).enumerate() {
            let ranges = match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(ranges) => ranges,
                Err(e) => {
                    tracing::debug!(language = tag, error = %e, "highlighting failed");
                    return None;
                }
            };
            let ranges: Vec<_> = ranges
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
                .filter(|(_, text)| !text.is_empty())
                .collect();
            let Ok(content) = styled_line_to_highlighted_html(&ranges, IncludeBackground::No) else {
                return None;
            };

            if number > 0 {
                html.push('\n');
            }
            let _ = write!(
                html,
                "<span class=\"line\"><span class=\"line-number\">{}</span><span class=\"line-content\">{content}</span></span>",
                number + 1
            );
        }

        html.push_str("</code></pre>");
        Some(html)
    }
}

fn css_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn closest_syntax(tag: &str) -> Option<&'static str> {
    let tag = tag.to_ascii_lowercase();
    SYNTAX_SET
        .syntaxes()
        .iter()
        .map(|s| {
            let distance = strsim::damerau_levenshtein(&tag, &s.name.to_ascii_lowercase());
            (s.name.as_str(), distance)
        })
        .filter(|(_, distance)| *distance <= 3)
        .min_by_key(|(_, distance)| *distance)
        .map(|(name, _)| name)
}

/// Suggests a built-in theme name for a misspelled one.
#[must_use]
pub fn suggest_theme(input: &str) -> Option<&'static str> {
    theme_names()
        .into_iter()
        .map(|name| (name, strsim::damerau_levenshtein(input, name)))
        .filter(|(_, distance)| *distance <= 3)
        .min_by_key(|(_, distance)| *distance)
        .map(|(name, _)| name)
}
