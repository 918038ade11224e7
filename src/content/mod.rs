//! Slide Content Renderer
//!
//! Converts one slide's markdown body into displayable content. Fenced code
//! is dispatched on its language tag: diagram blocks become placeholders for
//! the diagram pass, other tagged blocks are highlighted, the rest stay
//! plain. Rendering never fails; anything malformed degrades to text.

pub mod block;
pub mod highlight;
pub mod language;

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

use crate::escape::escape_xml;

pub use block::{ContentBlock, outline};
pub use highlight::Highlighter;
pub use language::{CodeLanguage, DIAGRAM_TAG};

/// Markdown extensions enabled for slide bodies.
pub(crate) fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

// ============================================================================
// Rendered Output
// ============================================================================

/// One displayable node of rendered slide content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    /// Finished HTML.
    Html(String),
    /// A diagram-tagged block awaiting the diagram pass.
    Diagram {
        /// Description text with one trailing newline stripped.
        source: String,
    },
}

/// The rendered subtree of one slide body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContent {
    /// Nodes in document order.
    pub nodes: Vec<ContentNode>,
}

impl RenderedContent {
    /// Number of diagram placeholders.
    #[must_use]
    pub fn diagram_count(&self) -> usize {
        self.diagram_sources().count()
    }

    /// Diagram description texts in document order.
    pub fn diagram_sources(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            ContentNode::Diagram { source } => Some(source.as_str()),
            ContentNode::Html(_) => None,
        })
    }

    /// Writes buffered markdown events out as one HTML fragment.
    fn flush(&mut self, events: &mut Vec<Event<'_>>) {
        if events.is_empty() {
            return;
        }
        let mut markup = String::new();
        html::push_html(&mut markup, events.drain(..));
        self.push_html(&markup);
    }

    fn push_html(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if let Some(ContentNode::Html(last)) = self.nodes.last_mut() {
            last.push_str(fragment);
        } else {
            self.nodes.push(ContentNode::Html(fragment.to_string()));
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Markdown to [`RenderedContent`] converter.
#[derive(Debug, Clone, Default)]
pub struct ContentRenderer {
    highlighter: Highlighter,
}

impl ContentRenderer {
    /// Creates a renderer that highlights with `highlighter`.
    #[must_use]
    pub const fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    /// The highlighter used for tagged code blocks.
    #[must_use]
    pub const fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Renders one slide body.
    ///
    /// Output is recomputed from scratch on every call. Raw HTML in the body
    /// is shown as text, never passed through as markup.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderedContent {
        let mut content = RenderedContent::default();
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut code: Option<(CodeBlockKind<'_>, Range<usize>, String)> = None;

        for (event, range) in Parser::new_ext(markdown, markdown_options()).into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => code = Some((kind, range, String::new())),
                Event::Text(text) if code.is_some() => {
                    if let Some((_, _, body)) = code.as_mut() {
                        body.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    let Some((kind, range, body)) = code.take() else {
                        continue;
                    };
                    let body = strip_trailing_newline(&body);
                    let closed = is_closed_fence(markdown, range);
                    let language = match &kind {
                        CodeBlockKind::Fenced(info) if closed => CodeLanguage::from_info(info),
                        _ => CodeLanguage::Plain,
                    };
                    match language {
                        CodeLanguage::Diagram => {
                            content.flush(&mut events);
                            content.nodes.push(ContentNode::Diagram {
                                source: body.to_string(),
                            });
                        }
                        CodeLanguage::Highlight(tag) => {
                            let rendered = self
                                .highlighter
                                .highlight(&tag, body)
                                .unwrap_or_else(|| plain_block(body));
                            events.push(Event::Html(format!("{rendered}\n").into()));
                        }
                        CodeLanguage::Plain => {
                            events.push(Event::Html(format!("{}\n", plain_block(body)).into()));
                        }
                    }
                }
                Event::Start(Tag::HtmlBlock) => events.push(Event::Start(Tag::Paragraph)),
                Event::End(TagEnd::HtmlBlock) => events.push(Event::End(TagEnd::Paragraph)),
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                event => events.push(event),
            }
        }

        content.flush(&mut events);
        content
    }
}

/// Undecorated code block: the literal text, escaped, with no markup inside.
#[must_use]
pub fn plain_block(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_xml(code))
}

fn strip_trailing_newline(text: &str) -> &str {
    text.strip_suffix('\n')
        .map_or(text, |t| t.strip_suffix('\r').unwrap_or(t))
}

/// True when the fenced block at `range` ends with a closing fence.
///
/// CommonMark lets an unclosed fence run to the end of its container; such a
/// block is treated as malformed. Blockquote markers in front of the fence
/// lines are not part of the fence.
fn is_closed_fence(markdown: &str, range: Range<usize>) -> bool {
    let line_start = markdown[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let block = &markdown[range.start..range.end];
    let opening = block.trim_start_matches(|c: char| c == '>' || c.is_whitespace());
    let depth = markdown[line_start..range.start].matches('>').count()
        + block[..block.len() - opening.len()].matches('>').count();

    let Some(fence_char) = opening.chars().next().filter(|c| matches!(c, '`' | '~')) else {
        return false;
    };
    let fence_len = opening.chars().take_while(|&c| c == fence_char).count();

    let mut lines = opening.trim_end().lines();
    lines.next();
    lines.next_back().is_some_and(|last| {
        let last = strip_quote_markers(last, depth).trim();
        last.len() >= fence_len && last.chars().all(|c| c == fence_char)
    })
}

fn strip_quote_markers(line: &str, depth: usize) -> &str {
    let mut rest = line;
    for _ in 0..depth {
        let trimmed = rest.trim_start();
        rest = trimmed.strip_prefix('>').unwrap_or(trimmed);
    }
    rest
}
