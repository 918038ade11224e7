//! Page shell: composes a deck's slides into one HTML document.

use std::fmt::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Deck;
use crate::content::{ContentRenderer, Highlighter};
use crate::escape::escape_xml;
use crate::diagram::{DiagramRenderer, PassReport};
use crate::error::ConfigError;
use crate::observability::EventEmitter;
use crate::page::mounted::MountedSlide;
use crate::page::slide::Slide;

/// Document-wide title and description, set once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMetadata {
    /// `<title>` text.
    pub title: String,
    /// `<meta name="description">` content.
    #[serde(default)]
    pub description: String,
}

/// Output of rendering a whole page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Complete HTML document.
    pub html: String,
    /// Combined diagram pass results across all slides.
    pub report: PassReport,
}

/// An ordered deck of slides plus the renderers shared by all of them.
#[derive(Debug)]
pub struct Page {
    metadata: PageMetadata,
    stylesheet: Option<String>,
    slides: Vec<Arc<Slide>>,
    content: ContentRenderer,
    diagrams: DiagramRenderer,
}

impl Page {
    /// Creates a page from already-built parts.
    #[must_use]
    pub fn new(
        metadata: PageMetadata,
        slides: Vec<Slide>,
        content: ContentRenderer,
        diagrams: DiagramRenderer,
    ) -> Self {
        Self {
            metadata,
            stylesheet: None,
            slides: slides.into_iter().map(Arc::new).collect(),
            content,
            diagrams,
        }
    }

    /// Builds a page from a loaded deck.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the deck names an unknown
    /// highlight theme.
    pub fn from_deck(deck: Deck) -> Result<Self, ConfigError> {
        let highlighter = match deck.highlight_theme.as_deref() {
            Some(name) => Highlighter::new(name)?,
            None => Highlighter::default(),
        };

        let mut page = Self::new(
            deck.metadata,
            deck.slides,
            ContentRenderer::new(highlighter),
            DiagramRenderer::new(deck.theme),
        );
        page.stylesheet = deck.stylesheet;
        Ok(page)
    }

    /// Links a stylesheet from the document head.
    #[must_use]
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheet = Some(href.into());
        self
    }

    /// Sends slide and diagram events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.diagrams = self.diagrams.with_events(events);
        self
    }

    /// Page metadata.
    #[must_use]
    pub const fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    /// Slides in presentation order.
    #[must_use]
    pub fn slides(&self) -> &[Arc<Slide>] {
        &self.slides
    }

    /// The page-wide diagram renderer.
    #[must_use]
    pub const fn diagram_renderer(&self) -> &DiagramRenderer {
        &self.diagrams
    }

    /// Mounts the slide at `index`. Must be called within a tokio runtime.
    #[must_use]
    pub fn mount(&self, index: usize) -> Option<MountedSlide> {
        let slide = self.slides.get(index)?;
        Some(MountedSlide::mount(
            index,
            Arc::clone(slide),
            self.content.clone(),
            self.diagrams.clone(),
        ))
    }

    /// Renders every slide in order and returns the full document.
    ///
    /// Each slide is mounted, its diagram pass settled, its HTML captured,
    /// and then unmounted, so diagram ids follow document order.
    pub async fn render(&self) -> RenderedPage {
        let mut sections = String::new();
        let mut report = PassReport::default();

        for index in 0..self.slides.len() {
            let Some(mut mounted) = self.mount(index) else {
                continue;
            };
            report.merge(mounted.settle().await);
            sections.push_str(&mounted.html());
            sections.push('\n');
            mounted.unmount();
        }

        RenderedPage {
            html: self.document(&sections),
            report,
        }
    }

    fn document(&self, sections: &str) -> String {
        let mut html = String::with_capacity(sections.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape_xml(&self.metadata.title));
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_xml(&self.metadata.description)
        );
        if let Some(href) = &self.stylesheet {
            let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\">", escape_xml(href));
        }
        html.push_str("</head>\n<body>\n<main class=\"deck\">\n");
        html.push_str(sections);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}
