//! Page shell and slide lifecycle.
//!
//! A [`Page`] owns the ordered slides and the renderers they share. Mounting
//! a slide yields a [`MountedSlide`] whose [`SlideRegion`] is painted at once
//! and filled in by the background diagram pass.

pub mod mounted;
pub mod region;
pub mod shell;
pub mod slide;

pub use mounted::MountedSlide;
pub use region::{CommitOutcome, PlaceholderState, SlideRegion};
pub use shell::{Page, PageMetadata, RenderedPage};
pub use slide::{Slide, SlideKind};
