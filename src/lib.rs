//! `slidedeck` - Markdown slide decks with highlighted code and diagrams
//!
//! A deck is an ordered list of slides. Each slide's markdown body is
//! rendered by the [`content`] module, which routes fenced code blocks to
//! plain text, syntax highlighting, or a diagram placeholder. The
//! [`diagram`] module fills those placeholders in a background pass once the
//! slide is mounted by the [`page`] shell.

pub mod cli;
pub mod config;
pub mod content;
pub mod diagram;
pub mod error;
pub mod escape;
pub mod observability;
pub mod page;
