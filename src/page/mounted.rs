//! Slide mount lifecycle.
//!
//! Mounting paints a slide's content immediately, placeholders included,
//! and schedules the diagram pass as a background task. Unmounting cancels
//! the pass and detaches the region so late renders are dropped.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::content::{ContentRenderer, RenderedContent};
use crate::diagram::{DiagramRenderer, PassReport};
use crate::observability::Event;
use crate::page::region::{PlaceholderState, SlideRegion};
use crate::page::slide::Slide;

/// A slide currently shown on the page.
#[derive(Debug)]
pub struct MountedSlide {
    index: usize,
    slide: Arc<Slide>,
    region: Arc<SlideRegion>,
    content: ContentRenderer,
    diagrams: DiagramRenderer,
    cancel: CancellationToken,
    passes: Vec<JoinHandle<()>>,
    reports: Arc<Mutex<PassReport>>,
}

impl MountedSlide {
    /// Paints `slide` and schedules its first diagram pass.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(
        index: usize,
        slide: Arc<Slide>,
        content: ContentRenderer,
        diagrams: DiagramRenderer,
    ) -> Self {
        let rendered = render_body(&content, &slide);
        let diagram_count = rendered.diagram_count();

        tracing::info!(slide = index, title = %slide.title, diagrams = diagram_count, "slide mounted");
        if let Some(events) = diagrams.events() {
            events.emit(Event::SlideMounted {
                timestamp: Utc::now(),
                slide_index: index,
                title: slide.title.clone(),
                diagrams: diagram_count,
            });
        }

        let mut mounted = Self {
            index,
            slide,
            region: Arc::new(SlideRegion::new(rendered)),
            content,
            diagrams,
            cancel: CancellationToken::new(),
            passes: Vec::new(),
            reports: Arc::default(),
        };
        mounted.schedule_pass();
        mounted
    }

    /// Position of the slide in its deck.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The slide being shown.
    #[must_use]
    pub fn slide(&self) -> &Arc<Slide> {
        &self.slide
    }

    /// The region this slide owns.
    #[must_use]
    pub fn region(&self) -> &Arc<SlideRegion> {
        &self.region
    }

    /// Re-renders without a content change: only schedules another pass,
    /// which finds nothing to do once every placeholder was visited.
    pub fn rerender(&mut self) {
        self.schedule_pass();
    }

    /// Swaps in a new version of the slide.
    ///
    /// When the rendered body differs, the region's content is replaced and
    /// its placeholders start over as pending; in-flight renders for the old
    /// content are discarded.
    pub fn update(&mut self, slide: Arc<Slide>) {
        let rendered = render_body(&self.content, &slide);
        let old = render_body(&self.content, &self.slide);
        self.slide = slide;

        if rendered != old {
            tracing::debug!(slide = self.index, "slide content changed, replacing region");
            self.region.replace_content(rendered);
        }
        self.schedule_pass();
    }

    /// Waits for every scheduled pass and returns their combined report.
    pub async fn settle(&mut self) -> PassReport {
        for pass in self.passes.drain(..) {
            if let Err(e) = pass.await {
                tracing::warn!(slide = self.index, error = %e, "diagram pass task failed");
            }
        }
        std::mem::take(&mut *self.reports.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current HTML of the slide, wrapped in its section markup.
    #[must_use]
    pub fn html(&self) -> String {
        self.slide.wrap(self.index, &self.region.to_html())
    }

    /// Current placeholder states.
    #[must_use]
    pub fn placeholder_states(&self) -> Vec<PlaceholderState> {
        self.region.placeholder_states()
    }

    /// Removes the slide from the page: cancels running passes and detaches
    /// the region so nothing more is written into it.
    pub fn unmount(self) {
        drop(self);
    }

    /// Spawns a pass; its report is folded into `reports` when it finishes.
    fn schedule_pass(&mut self) {
        self.passes.retain(|pass| !pass.is_finished());

        let renderer = self.diagrams.clone();
        let region = Arc::clone(&self.region);
        let cancel = self.cancel.child_token();
        let reports = Arc::clone(&self.reports);
        self.passes.push(tokio::spawn(async move {
            let report = renderer.render_pending(&region, &cancel).await;
            reports.lock().unwrap_or_else(PoisonError::into_inner).merge(report);
        }));
    }
}

impl Drop for MountedSlide {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.region.detach();
        tracing::debug!(slide = self.index, "slide unmounted");
    }
}

fn render_body(content: &ContentRenderer, slide: &Slide) -> RenderedContent {
    slide.body().map(|body| content.render(body)).unwrap_or_default()
}
