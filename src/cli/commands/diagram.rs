//! `diagram` command: one flowchart description to SVG.

use std::io::Read;
use std::path::Path;

use crate::cli::args::DiagramArgs;
use crate::config::DeckLoader;
use crate::diagram::{DiagramDescriptor, DiagramRenderer, DiagramTheme};
use crate::error::SlideDeckError;

/// Render a single flowchart description.
///
/// # Errors
///
/// Returns an I/O error if the input cannot be read or the output written,
/// a config error if `--deck` cannot be loaded, and a diagram error if the
/// description does not parse.
pub fn run(args: &DiagramArgs) -> Result<(), SlideDeckError> {
    let source = read_input(&args.input)?;
    let theme = match &args.deck {
        Some(deck) => DeckLoader::with_defaults().load(deck)?.theme,
        None => DiagramTheme::default(),
    };

    let renderer = DiagramRenderer::new(theme);
    let descriptor = DiagramDescriptor {
        id: renderer.ids().allocate(),
        source,
    };
    let rendered = renderer.render(&descriptor)?;
    tracing::info!(
        diagram_id = %rendered.id,
        nodes = rendered.nodes,
        edges = rendered.edges,
        "diagram rendered"
    );

    let mut svg = rendered.svg;
    svg.push('\n');
    super::write_output(args.output.as_deref(), &svg)
}

fn read_input(path: &Path) -> Result<String, SlideDeckError> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
