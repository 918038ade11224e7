//! `render` command: deck to HTML page.

use std::sync::Arc;

use crate::cli::args::RenderArgs;
use crate::config::DeckLoader;
use crate::error::SlideDeckError;
use crate::observability::EventEmitter;
use crate::page::Page;

/// Render a deck to a single HTML document.
///
/// # Errors
///
/// Returns a config error if the deck cannot be loaded, an I/O error if the
/// output cannot be written, and `DiagramsFailed` when
/// `--fail-on-diagram-error` is set and any diagram failed.
pub async fn run(args: &RenderArgs) -> Result<(), SlideDeckError> {
    tracing::info!(deck = %args.deck.display(), "loading deck");
    let deck = DeckLoader::with_defaults().load(&args.deck)?;

    let mut page = Page::from_deck(deck)?;
    if let Some(path) = &args.events_file {
        page = page.with_events(Arc::new(EventEmitter::from_file(path)?));
    }

    let rendered = page.render().await;
    let failed = rendered.report.failed.len();
    let total = failed + rendered.report.rendered.len();
    tracing::info!(
        slides = page.slides().len(),
        diagrams = total,
        failed,
        "deck rendered"
    );

    super::write_output(args.output.as_deref(), &rendered.html)?;

    if args.fail_on_diagram_error && failed > 0 {
        return Err(SlideDeckError::DiagramsFailed { failed, total });
    }
    Ok(())
}
