//! Deck validation.
//!
//! Runs on the deserialized [`DeckConfig`] before any file is resolved.
//! Validation collects every issue instead of stopping at the first one.

use crate::config::loader::DeckLimits;
use crate::config::schema::{DeckConfig, SlideConfig};
use crate::content::highlight::{Highlighter, suggest_theme, theme_names};
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of deck validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Deck validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a deck and returns every issue found.
    pub fn validate(&mut self, deck: &DeckConfig, limits: &DeckLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_metadata(deck);
        self.validate_styling(deck);
        self.validate_slides(deck, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Page-level
    // ========================================================================

    fn validate_metadata(&mut self, deck: &DeckConfig) {
        if deck.metadata.title.trim().is_empty() {
            self.add_error("metadata.title", "Page title is required and cannot be empty");
        }
        if deck.metadata.description.trim().is_empty() {
            self.add_warning("metadata.description", "Page description is empty");
        }
    }

    fn validate_styling(&mut self, deck: &DeckConfig) {
        if deck.stylesheet.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.add_warning("stylesheet", "Stylesheet href is empty and will be ignored");
        }

        if let Some(theme) = &deck.theme {
            for (field, value) in theme.invalid_colors() {
                self.add_error(
                    &format!("theme.{field}"),
                    &format!("'{value}' is not a CSS hex color or color name"),
                );
            }
        }

        if let Some(name) = &deck.highlight_theme {
            if Highlighter::new(name).is_err() {
                let message = suggest_theme(name).map_or_else(
                    || {
                        format!(
                            "Unknown highlight theme '{name}' (available: {})",
                            theme_names().join(", ")
                        )
                    },
                    |suggestion| format!("Unknown highlight theme '{name}' (did you mean '{suggestion}'?)"),
                );
                self.add_error("highlight_theme", &message);
            }
        }
    }

    // ========================================================================
    // Slides
    // ========================================================================

    fn validate_slides(&mut self, deck: &DeckConfig, limits: &DeckLimits) {
        if deck.slides.is_empty() {
            self.add_error("slides", "Deck has no slides");
            return;
        }

        if deck.slides.len() > limits.max_slides {
            self.add_error(
                "slides",
                &format!(
                    "Deck has {} slides, more than the limit of {}",
                    deck.slides.len(),
                    limits.max_slides
                ),
            );
        }

        for (index, slide) in deck.slides.iter().enumerate() {
            let path = format!("slides[{index}]");
            if slide.title().trim().is_empty() {
                self.add_error(&format!("{path}.title"), "Slide title is required and cannot be empty");
            }

            match slide {
                SlideConfig::Title { .. } => {
                    if index > 0 {
                        self.add_warning(&path, "Title slide is not the first slide");
                    }
                }
                SlideConfig::Markdown {
                    body, body_file, ..
                } => match (body, body_file) {
                    (Some(_), Some(_)) => self.add_error(
                        &path,
                        "Slide sets both 'body' and 'body_file'; use exactly one",
                    ),
                    (None, None) => {
                        self.add_error(&path, "Markdown slide needs 'body' or 'body_file'");
                    }
                    (Some(body), None) if body.trim().is_empty() => {
                        self.add_warning(&format!("{path}.body"), "Slide body is empty");
                    }
                    _ => {}
                },
            }
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
