//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod diagram;
pub mod outline;
pub mod render;
pub mod validate;
pub mod version;

use std::io::Write;
use std::path::Path;

use crate::cli::args::{Cli, Commands};
use crate::error::SlideDeckError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), SlideDeckError> {
    match cli.command {
        Commands::Render(args) => render::run(&args).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::Outline(args) => outline::run(&args),
        Commands::Diagram(args) => diagram::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Writes command output to `path`, or to stdout when `path` is `None`.
fn write_output(path: Option<&Path>, contents: &str) -> Result<(), SlideDeckError> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)?;
            tracing::info!(path = %path.display(), bytes = contents.len(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
