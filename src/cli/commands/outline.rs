//! `outline` command: content blocks per slide.

use crate::cli::args::{OutlineArgs, OutputFormat};
use crate::config::DeckLoader;
use crate::content::{ContentBlock, outline};
use crate::error::SlideDeckError;
use crate::page::SlideKind;

/// Print every slide's content blocks.
///
/// # Errors
///
/// Returns a config error if the deck cannot be loaded.
pub fn run(args: &OutlineArgs) -> Result<(), SlideDeckError> {
    let deck = DeckLoader::with_defaults().load(&args.deck)?;

    match args.format {
        OutputFormat::Human => {
            for (index, slide) in deck.slides.iter().enumerate() {
                let kind = match slide.kind {
                    SlideKind::Title { .. } => "title",
                    SlideKind::Markdown { .. } => "markdown",
                };
                println!("{:>3}. {} [{kind}]", index + 1, slide.title);
                for block in slide.body().map(outline).unwrap_or_default() {
                    println!("       {}", describe(&block));
                }
            }
        }
        OutputFormat::Json => {
            let slides: Vec<serde_json::Value> = deck
                .slides
                .iter()
                .enumerate()
                .map(|(index, slide)| {
                    serde_json::json!({
                        "index": index,
                        "slide": slide,
                        "blocks": slide.body().map(outline).unwrap_or_default(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&slides)?);
        }
    }

    Ok(())
}

fn describe(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Heading { level, text } => format!("heading h{level}: {text}"),
        ContentBlock::List {
            ordered,
            depth,
            items,
        } => {
            let kind = if *ordered { "ordered" } else { "bullet" };
            format!("{}{kind} list ({items} items)", "  ".repeat(*depth))
        }
        ContentBlock::Paragraph { text } => {
            format!("paragraph: {}", crate::escape::truncate(text, 60))
        }
        ContentBlock::InlineCode { code } => format!("inline code: {code}"),
        ContentBlock::FencedCode {
            language,
            strategy,
            lines,
        } => format!(
            "code block [{}] {} ({lines} lines)",
            language.as_deref().unwrap_or("-"),
            strategy.strategy()
        ),
        ContentBlock::Table { columns, rows } => format!("table {columns}x{rows}"),
        ContentBlock::Rule => "rule".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CodeLanguage;

    #[test]
    fn test_describe_blocks() {
        assert_eq!(
            describe(&ContentBlock::FencedCode {
                language: Some("mermaid".to_string()),
                strategy: CodeLanguage::Diagram,
                lines: 4,
            }),
            "code block [mermaid] diagram (4 lines)"
        );
        assert_eq!(
            describe(&ContentBlock::List {
                ordered: false,
                depth: 1,
                items: 2
            }),
            "  bullet list (2 items)"
        );
        assert_eq!(
            describe(&ContentBlock::Heading {
                level: 2,
                text: "Agenda".to_string()
            }),
            "heading h2: Agenda"
        );
    }
}
