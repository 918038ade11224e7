//! Slides: immutable units of presentation content.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::escape::escape_xml;

/// What a slide displays besides its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideKind {
    /// Opening card of a deck.
    Title {
        /// Line under the title.
        subtitle: Option<String>,
        /// Presenter name.
        presenter: Option<String>,
        /// Date of the talk.
        date: Option<NaiveDate>,
    },
    /// Title plus a markdown body.
    Markdown {
        /// Raw markdown payload.
        body: String,
    },
}

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// Heading shown on the slide.
    pub title: String,
    /// Slide content.
    #[serde(flatten)]
    pub kind: SlideKind,
}

impl Slide {
    /// Creates a markdown slide.
    #[must_use]
    pub fn markdown(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: SlideKind::Markdown { body: body.into() },
        }
    }

    /// Creates a title card.
    #[must_use]
    pub fn title_card(
        title: impl Into<String>,
        subtitle: Option<String>,
        presenter: Option<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            title: title.into(),
            kind: SlideKind::Title {
                subtitle,
                presenter,
                date,
            },
        }
    }

    /// Markdown body, if this slide has one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match &self.kind {
            SlideKind::Markdown { body } => Some(body),
            SlideKind::Title { .. } => None,
        }
    }

    /// CSS modifier class for the slide's `<section>`.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self.kind {
            SlideKind::Title { .. } => "slide-title",
            SlideKind::Markdown { .. } => "slide-markdown",
        }
    }

    /// Wraps already-rendered body HTML in the slide's section markup.
    #[must_use]
    pub fn wrap(&self, index: usize, body_html: &str) -> String {
        let mut html = String::new();
        let title = escape_xml(&self.title);
        let _ = write!(
            html,
            "<section class=\"slide {}\" id=\"slide-{}\">",
            self.class(),
            index + 1
        );

        match &self.kind {
            SlideKind::Title {
                subtitle,
                presenter,
                date,
            } => {
                let _ = write!(html, "<h1>{title}</h1>");
                if let Some(subtitle) = subtitle {
                    let _ = write!(html, "<p class=\"subtitle\">{}</p>", escape_xml(subtitle));
                }
                if let Some(presenter) = presenter {
                    let _ = write!(html, "<p class=\"presenter\">{}</p>", escape_xml(presenter));
                }
                if let Some(date) = date {
                    let _ = write!(
                        html,
                        "<time datetime=\"{}\">{}</time>",
                        date.format("%Y-%m-%d"),
                        date.format("%B %-d, %Y")
                    );
                }
            }
            SlideKind::Markdown { .. } => {
                let _ = write!(html, "<h1>{title}</h1><div class=\"slide-body\">{body_html}</div>");
            }
        }

        html.push_str("</section>");
        html
    }
}
