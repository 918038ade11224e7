//! `validate` command: load decks and try every diagram.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{Deck, DeckLoader};
use crate::content::ContentRenderer;
use crate::diagram::{DiagramDescriptor, DiagramRenderer};
use crate::error::{ConfigError, SlideDeckError, ValidationIssue};

/// Validation outcome for one deck file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    slides: usize,
    diagrams: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate deck files and every diagram they contain.
///
/// # Errors
///
/// Returns the first config error when a deck fails to load,
/// `DiagramsFailed` when any diagram does not render, or a validation error
/// for warnings under `--strict`.
pub fn run(args: &ValidateArgs) -> Result<(), SlideDeckError> {
    let loader = DeckLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_config_error: Option<ConfigError> = None;
    let mut diagram_failures = 0;
    let mut diagram_total = 0;
    let mut strict_issues: Vec<ValidationIssue> = Vec::new();

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating deck");
        match loader.load(path) {
            Ok(deck) => {
                let (report, failures) = check_deck(path, &deck);
                diagram_total += report.diagrams;
                diagram_failures += failures;
                if args.strict {
                    strict_issues.extend(deck.warnings.iter().cloned());
                }
                reports.push(report);
            }
            Err(e) => {
                reports.push(FileReport {
                    file: path.clone(),
                    valid: false,
                    slides: 0,
                    diagrams: 0,
                    errors: config_messages(&e),
                    warnings: Vec::new(),
                });
                first_config_error.get_or_insert(e);
            }
        }
    }

    print_reports(&reports, args.format)?;

    if let Some(e) = first_config_error {
        return Err(e.into());
    }
    if diagram_failures > 0 {
        return Err(SlideDeckError::DiagramsFailed {
            failed: diagram_failures,
            total: diagram_total,
        });
    }
    if !strict_issues.is_empty() {
        return Err(ConfigError::ValidationError {
            path: args
                .files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            errors: strict_issues,
        }
        .into());
    }
    Ok(())
}

/// Renders every diagram of a loaded deck; returns the report and the
/// number of failed diagrams.
fn check_deck(path: &Path, deck: &Deck) -> (FileReport, usize) {
    let content = ContentRenderer::default();
    let renderer = DiagramRenderer::new(deck.theme.clone());
    let mut errors = Vec::new();
    let mut diagrams = 0;

    for (index, slide) in deck.slides.iter().enumerate() {
        let Some(body) = slide.body() else {
            continue;
        };
        for (position, source) in content.render(body).diagram_sources().enumerate() {
            diagrams += 1;
            let descriptor = DiagramDescriptor {
                id: renderer.ids().allocate(),
                source: source.to_string(),
            };
            if let Err(e) = renderer.render(&descriptor) {
                tracing::warn!(slide = index, diagram = position, error = %e, "diagram failed to render");
                errors.push(format!(
                    "slides[{index}] diagram {} ({}): {e}",
                    position + 1,
                    slide.title
                ));
            }
        }
    }

    let failures = errors.len();
    let report = FileReport {
        file: path.to_path_buf(),
        valid: errors.is_empty(),
        slides: deck.slides.len(),
        diagrams,
        errors,
        warnings: deck.warnings.iter().map(ToString::to_string).collect(),
    };
    (report, failures)
}

fn config_messages(error: &ConfigError) -> Vec<String> {
    match error {
        ConfigError::ValidationError { errors, .. } => errors.iter().map(ToString::to_string).collect(),
        other => vec![other.to_string()],
    }
}

fn print_reports(reports: &[FileReport], format: OutputFormat) -> Result<(), SlideDeckError> {
    match format {
        OutputFormat::Human => {
            for report in reports {
                let mark = if report.valid { "ok" } else { "FAILED" };
                println!(
                    "{}: {mark} ({} slides, {} diagrams)",
                    report.file.display(),
                    report.slides,
                    report.diagrams
                );
                for error in &report.errors {
                    println!("  error: {error}");
                }
                for warning in &report.warnings {
                    println!("  {warning}");
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reports)?),
    }
    Ok(())
}
