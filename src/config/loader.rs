//! Deck loader
//!
//! Loading pipeline:
//! 1. File size check
//! 2. YAML parsing into [`DeckConfig`]
//! 3. Validation (all issues collected)
//! 4. `body_file` resolution relative to the deck file
//! 5. Conversion into immutable [`Slide`]s

use std::path::{Path, PathBuf};

use crate::config::schema::{DeckConfig, SlideConfig};
use crate::config::validation::Validator;
use crate::diagram::DiagramTheme;
use crate::error::{ConfigError, ValidationIssue};
use crate::page::{PageMetadata, Slide};

// ============================================================================
// Public API
// ============================================================================

/// Options for the deck loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Size and count limits.
    pub limits: DeckLimits,
}

/// Limits that keep a deck within what one page renders.
#[derive(Debug, Clone)]
pub struct DeckLimits {
    /// Maximum number of slides.
    pub max_slides: usize,

    /// Maximum size in bytes of the deck file and of each body file.
    pub max_file_size: usize,
}

impl Default for DeckLimits {
    fn default() -> Self {
        Self {
            max_slides: env_or("SLIDEDECK_MAX_SLIDES", 200),
            max_file_size: env_or("SLIDEDECK_MAX_FILE_SIZE", 1024 * 1024),
        }
    }
}

/// A loaded, validated deck ready to become a page.
#[derive(Debug, Clone)]
pub struct Deck {
    /// Document title and description.
    pub metadata: PageMetadata,
    /// Stylesheet href, if any.
    pub stylesheet: Option<String>,
    /// Diagram theme.
    pub theme: DiagramTheme,
    /// Highlight theme name, if not the default.
    pub highlight_theme: Option<String>,
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
    /// Validation warnings.
    pub warnings: Vec<ValidationIssue>,
}

/// Deck loader.
#[derive(Debug, Default)]
pub struct DeckLoader {
    options: LoaderOptions,
}

impl DeckLoader {
    /// Creates a new loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a deck file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The deck file or a body file cannot be read or is too large
    /// - YAML parsing fails
    /// - Validation finds errors
    pub fn load(&self, path: &Path) -> Result<Deck, ConfigError> {
        let raw = self.read_limited(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.load_str(&raw, path, base_dir)
    }

    /// Loads a deck from YAML text; `body_file` paths resolve against
    /// `base_dir` and `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the deck file read.
    pub fn load_str(&self, yaml: &str, path: &Path, base_dir: &Path) -> Result<Deck, ConfigError> {
        let yaml = yaml.strip_prefix('\u{feff}').unwrap_or(yaml);

        if yaml.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Deck file is empty".to_string(),
            });
        }

        let config: DeckConfig = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        let validation = Validator::new().validate(&config, &self.options.limits);
        if validation.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: validation.errors,
            });
        }
        for warning in &validation.warnings {
            tracing::warn!(path = %warning.path, "{}", warning.message);
        }

        let mut slides = Vec::with_capacity(config.slides.len());
        for slide in config.slides {
            slides.push(self.resolve_slide(slide, base_dir)?);
        }
        tracing::debug!(path = %path.display(), slides = slides.len(), "deck loaded");

        Ok(Deck {
            metadata: config.metadata,
            stylesheet: config.stylesheet.filter(|s| !s.trim().is_empty()),
            theme: config.theme.unwrap_or_default(),
            highlight_theme: config.highlight_theme,
            slides,
            warnings: validation.warnings,
        })
    }

    fn resolve_slide(&self, slide: SlideConfig, base_dir: &Path) -> Result<Slide, ConfigError> {
        match slide {
            SlideConfig::Title {
                title,
                subtitle,
                presenter,
                date,
            } => Ok(Slide::title_card(title, subtitle, presenter, date)),
            SlideConfig::Markdown {
                title,
                body,
                body_file,
            } => {
                let body = match (body, body_file) {
                    (Some(body), _) => body,
                    (None, Some(file)) => self.read_limited(&resolve_path(base_dir, &file))?,
                    (None, None) => String::new(),
                };
                Ok(Slide::markdown(title, body))
            }
        }
    }

    fn read_limited(&self, path: &Path) -> Result<String, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.limits.max_file_size;
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > limit {
            return Err(ConfigError::LimitExceeded {
                what: format!("file size of {}", path.display()),
                actual: size,
                limit,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        Ok(raw.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(raw))
    }
}

fn resolve_path(base_dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base_dir.join(file)
    }
}

/// Reads a limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::SlideKind;

    const DECK: &str = r#"
metadata:
  title: Rust on Kubernetes
  description: Webinar deck
slides:
  - kind: title
    title: Rust on Kubernetes
    presenter: Sam
  - kind: markdown
    title: Pipeline
    body_file: pipeline.md
"#;

    fn loader() -> DeckLoader {
        DeckLoader::new(LoaderOptions {
            limits: DeckLimits {
                max_slides: 10,
                max_file_size: 4096,
            },
        })
    }

    #[test]
    fn test_load_resolves_body_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("deck.yaml"), DECK).unwrap();
        std::fs::write(dir.path().join("pipeline.md"), "- build\n- test\n").unwrap();

        let deck = loader().load(&dir.path().join("deck.yaml")).unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[1].body(), Some("- build\n- test\n"));
        assert!(matches!(deck.slides[0].kind, SlideKind::Title { .. }));
        assert_eq!(deck.theme, DiagramTheme::default());
    }

    #[test]
    fn test_missing_body_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader()
            .load_str(DECK, Path::new("deck.yaml"), dir.path())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { ref path } if path.ends_with("pipeline.md")));
    }

    #[test]
    fn test_missing_deck_file() {
        let err = loader().load(Path::new("/nonexistent/deck.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.yaml");
        std::fs::write(&path, "#".repeat(5000)).unwrap();
        let err = loader().load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LimitExceeded { actual: 5000, limit: 4096, .. }));
    }

    #[test]
    fn test_parse_error_has_line() {
        let err = loader()
            .load_str("metadata:\n  title: [unclosed\n", Path::new("deck.yaml"), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { line: Some(_), .. }));
    }

    #[test]
    fn test_empty_deck_file() {
        let err = loader()
            .load_str("\u{feff}  \n", Path::new("deck.yaml"), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { line: None, .. }));
    }

    #[test]
    fn test_validation_errors_surface() {
        let err = loader()
            .load_str("metadata: {title: ''}\nslides: []\n", Path::new("deck.yaml"), Path::new("."))
            .unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_warnings_returned() {
        let deck = loader()
            .load_str(
                "metadata: {title: T}\nstylesheet: ''\nslides:\n  - {kind: markdown, title: A, body: x}\n",
                Path::new("deck.yaml"),
                Path::new("."),
            )
            .unwrap();
        assert_eq!(deck.warnings.len(), 2);
        assert_eq!(deck.stylesheet, None);
    }

    #[test]
    fn test_env_or_fallback() {
        assert_eq!(env_or("SLIDEDECK_TEST_UNSET_LIMIT_XYZ123", 7usize), 7);
    }
}
