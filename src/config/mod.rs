//! Deck configuration
//!
//! YAML deck files describe page metadata, styling, and the ordered slides.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{Deck, DeckLimits, DeckLoader, LoaderOptions};
pub use schema::{DeckConfig, SlideConfig};
pub use validation::{ValidationResult, Validator};
