//! Structural view of a slide body.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::content::language::CodeLanguage;
use crate::content::markdown_options;

/// One structural unit of a slide's markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// `#`-style or setext heading.
    Heading {
        /// Level 1-6
        level: u8,
        /// Plain text of the heading.
        text: String,
    },
    /// Bulleted or numbered list.
    List {
        /// Numbered list
        ordered: bool,
        /// Nesting depth, 0 for a top-level list.
        depth: usize,
        /// Number of direct items.
        items: usize,
    },
    /// Paragraph of running text.
    Paragraph {
        /// Plain text of the paragraph.
        text: String,
    },
    /// Inline code span.
    InlineCode {
        /// Code text.
        code: String,
    },
    /// Fenced or indented code block.
    FencedCode {
        /// Info-string tag as written, if any.
        language: Option<String>,
        /// Presentation strategy picked for the block.
        strategy: CodeLanguage,
        /// Number of lines in the block.
        lines: usize,
    },
    /// GFM table.
    Table {
        /// Number of columns.
        columns: usize,
        /// Number of rows including the header row.
        rows: usize,
    },
    /// Thematic break.
    Rule,
}

/// Returns the content blocks of `markdown` in document order.
///
/// Nested lists appear after their parent list.
#[must_use]
pub fn outline(markdown: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut text: Option<String> = None;
    let mut lists: Vec<usize> = Vec::new();
    let mut table: Option<usize> = None;
    let mut code: Option<(Option<String>, CodeLanguage, String)> = None;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { .. } | Tag::Paragraph) => text = Some(String::new()),
            Event::End(TagEnd::Heading(level)) => {
                blocks.push(ContentBlock::Heading {
                    level: level as u8,
                    text: text.take().unwrap_or_default().trim().to_string(),
                });
            }
            Event::End(TagEnd::Paragraph) => {
                let body = text.take().unwrap_or_default();
                if !body.trim().is_empty() {
                    blocks.push(ContentBlock::Paragraph {
                        text: body.trim().to_string(),
                    });
                }
            }
            Event::Start(Tag::List(start)) => {
                lists.push(blocks.len());
                blocks.push(ContentBlock::List {
                    ordered: start.is_some(),
                    depth: lists.len() - 1,
                    items: 0,
                });
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                if let Some(ContentBlock::List { items, .. }) =
                    lists.last().and_then(|&i| blocks.get_mut(i))
                {
                    *items += 1;
                }
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let (language, strategy) = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let tag = info.split_whitespace().next().map(str::to_string);
                        (tag, CodeLanguage::from_info(&info))
                    }
                    CodeBlockKind::Indented => (None, CodeLanguage::Plain),
                };
                code = Some((language, strategy, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, strategy, body)) = code.take() {
                    blocks.push(ContentBlock::FencedCode {
                        language,
                        strategy,
                        lines: body.lines().count(),
                    });
                }
            }
            Event::Start(Tag::Table(alignments)) => {
                table = Some(blocks.len());
                blocks.push(ContentBlock::Table {
                    columns: alignments.len(),
                    rows: 0,
                });
            }
            Event::End(TagEnd::Table) => table = None,
            Event::Start(Tag::TableHead | Tag::TableRow) => {
                if let Some(ContentBlock::Table { rows, .. }) = table.and_then(|i| blocks.get_mut(i)) {
                    *rows += 1;
                }
            }
            Event::Rule => blocks.push(ContentBlock::Rule),
            Event::Code(span) => {
                if let Some(buffer) = text.as_mut() {
                    buffer.push_str(&span);
                }
                blocks.push(ContentBlock::InlineCode {
                    code: span.to_string(),
                });
            }
            Event::Text(chunk) => {
                if let Some((_, _, body)) = code.as_mut() {
                    body.push_str(&chunk);
                } else if let Some(buffer) = text.as_mut() {
                    buffer.push_str(&chunk);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buffer) = text.as_mut() {
                    buffer.push(' ');
                }
            }
            _ => {}
        }
    }

    blocks
}
