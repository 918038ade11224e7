//! Error types for `slidedeck`
//!
//! Content rendering never fails: malformed markdown and unknown code
//! languages degrade to plain text. The errors below cover the places where
//! failure is a value: deck configuration, diagram descriptions, and the CLI
//! process exit status.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `slidedeck` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Deck configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// One or more diagrams failed to render
    pub const DIAGRAM_ERROR: i32 = 4;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `slidedeck` operations.
///
/// Aggregates the domain errors and maps each one to a process exit code.
#[derive(Debug, Error)]
pub enum SlideDeckError {
    /// Deck configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Diagram description could not be rendered
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    /// One or more diagrams in a deck failed during validation
    #[error("{failed} of {total} diagram(s) failed to render")]
    DiagramsFailed {
        /// Number of failed diagrams
        failed: usize,
        /// Number of diagrams checked
        total: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SlideDeckError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Json(_) => ExitCode::ERROR,
            Self::Diagram(_) | Self::DiagramsFailed { .. } => ExitCode::DIAGRAM_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Deck configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the deck file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Deck validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the deck file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// A size or count limit was exceeded
    #[error("{what} exceeds limit: {actual} > {limit}")]
    LimitExceeded {
        /// What was being counted
        what: String,
        /// Observed value
        actual: usize,
        /// Configured limit
        limit: usize,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking a deck.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "slides[2].body")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the deck cannot be rendered as configured
    Error,
    /// Warning - the deck renders, but probably not as intended
    Warning,
}

// ============================================================================
// Diagram Errors
// ============================================================================

/// Errors raised while turning a diagram description into a graphic.
///
/// These never escape a page render: the diagram pass catches them per
/// placeholder and reports them on the diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    /// The description contains no statements at all
    #[error("empty diagram description")]
    Empty,

    /// The header names a diagram kind this renderer does not draw
    #[error("unsupported diagram type '{0}'")]
    Unsupported(String),

    /// The first statement is not a recognizable diagram header
    #[error("line {line}: expected 'flowchart' or 'graph' header, found '{found}'")]
    InvalidHeader {
        /// 1-based line number
        line: usize,
        /// The offending text
        found: String,
    },

    /// A shape or label was opened but never closed
    #[error("line {line}: unterminated '{open}' (expected '{close}')")]
    Unterminated {
        /// 1-based line number
        line: usize,
        /// Opening delimiter
        open: String,
        /// Delimiter that was expected
        close: String,
    },

    /// Any other statement that is not well-formed
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// The Mermaid engine rejected or failed on the description
    #[error("render failed: {0}")]
    Render(String),
}
