//! CLI argument definitions
//!
//! All Clap derive structs for `slidedeck` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Render markdown slide decks with highlighted code and flowchart diagrams.
#[derive(Parser, Debug)]
#[command(name = "slidedeck", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SLIDEDECK_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "SLIDEDECK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a deck to a single HTML page.
    Render(RenderArgs),

    /// Load decks and render every diagram without writing output.
    Validate(ValidateArgs),

    /// Print the content blocks of every slide.
    Outline(OutlineArgs),

    /// Render one flowchart description to SVG.
    Diagram(DiagramArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Deck Commands
// ============================================================================

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Path to the deck YAML file.
    pub deck: PathBuf,

    /// Write HTML here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write JSONL slide and diagram events to this file.
    #[arg(long, env = "SLIDEDECK_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Exit with an error when any diagram fails to render.
    #[arg(long)]
    pub fail_on_diagram_error: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Deck files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `outline`.
#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Path to the deck YAML file.
    pub deck: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `diagram`.
#[derive(Args, Debug)]
pub struct DiagramArgs {
    /// Flowchart description file (`-` reads stdin).
    pub input: PathBuf,

    /// Write SVG here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Deck file whose diagram theme to use.
    #[arg(long)]
    pub deck: Option<PathBuf>,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_output() {
        let cli = Cli::try_parse_from(["slidedeck", "render", "deck.yaml", "-o", "out.html"]).unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.deck, PathBuf::from("deck.yaml"));
                assert_eq!(args.output, Some(PathBuf::from("out.html")));
                assert!(!args.fail_on_diagram_error);
            }
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["slidedeck", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["slidedeck", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["slidedeck", "validate"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_validate_strict_json() {
        let cli = Cli::try_parse_from([
            "slidedeck", "validate", "a.yaml", "b.yaml", "--strict", "-f", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.strict);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("expected validate, got {other:?}"),
        }
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["slidedeck", "--color", variant, "version"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_log_format_parse() {
        let cli = Cli::try_parse_from(["slidedeck", "--log-format", "json", "version"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["slidedeck", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count_global() {
        let cli = Cli::try_parse_from(["slidedeck", "outline", "d.yaml", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["slidedeck", "--quiet", "diagram", "flow.mmd"]).unwrap();
        assert!(cli.quiet);
    }
}
