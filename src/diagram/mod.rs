//! Diagram Renderer
//!
//! Turns flowchart descriptions into inline SVG and drives the background
//! pass that replaces a slide region's diagram placeholders in place.
//!
//! A description is first checked by [`check`], then handed to the
//! `mermaid-rs-renderer` engine (parse, layout, SVG), and the result is
//! scoped to its diagram id by [`scope`]. The renderer owns the page-wide
//! [`IdAllocator`] and the read-only [`DiagramTheme`]; everything else is
//! scoped to the region a pass is working on.

pub mod check;
pub mod ids;
pub mod scope;
pub mod theme;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use mermaid_rs_renderer::config::LayoutConfig;
use mermaid_rs_renderer::layout::compute_layout;
use mermaid_rs_renderer::parser::parse_mermaid;
use mermaid_rs_renderer::render::render_svg;
use tokio_util::sync::CancellationToken;

use crate::error::DiagramError;
use crate::observability::{Event, EventEmitter};
use crate::page::region::{CommitOutcome, PlaceholderState, SlideRegion};

pub use ids::{DiagramId, IdAllocator};
pub use theme::DiagramTheme;

// ============================================================================
// Descriptors
// ============================================================================

/// A diagram description paired with the id it renders under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDescriptor {
    /// Session-unique id; becomes the `<svg>` element id.
    pub id: DiagramId,
    /// Flowchart description text.
    pub source: String,
}

/// Output of rendering one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDiagram {
    /// The id the graphic was rendered under.
    pub id: DiagramId,
    /// Standalone `<svg>` element.
    pub svg: String,
    /// Number of nodes drawn.
    pub nodes: usize,
    /// Number of edges drawn.
    pub edges: usize,
}

// ============================================================================
// Pass Report
// ============================================================================

/// Why a pass stopped before reaching the end of its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// The slide was unmounted (token cancelled or region detached).
    Unmounted,
    /// The region's content was replaced while the pass was running.
    ContentReplaced,
}

impl AbandonReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Unmounted => "unmounted",
            Self::ContentReplaced => "content_replaced",
        }
    }
}

/// Outcome of one pass over a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Ids whose placeholders were replaced with a graphic, in document order.
    pub rendered: Vec<DiagramId>,
    /// Ids whose placeholders were left unrendered, in document order.
    pub failed: Vec<DiagramId>,
    /// Set when the pass stopped early.
    pub abandoned: Option<AbandonReason>,
}

impl PassReport {
    /// True when the pass touched no placeholder and stopped normally.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty() && self.failed.is_empty() && self.abandoned.is_none()
    }

    /// Folds another report into this one, keeping document order.
    pub fn merge(&mut self, other: Self) {
        self.rendered.extend(other.rendered);
        self.failed.extend(other.failed);
        if other.abandoned.is_some() {
            self.abandoned = other.abandoned;
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Page-wide diagram renderer.
///
/// Cloning is cheap and clones share the id allocator, so every slide of a
/// page draws ids from the same sequence.
#[derive(Debug, Clone)]
pub struct DiagramRenderer {
    theme: Arc<DiagramTheme>,
    ids: Arc<IdAllocator>,
    events: Option<Arc<EventEmitter>>,
}

impl DiagramRenderer {
    /// Creates a renderer with its own id sequence starting at `mermaid-0`.
    #[must_use]
    pub fn new(theme: DiagramTheme) -> Self {
        Self {
            theme: Arc::new(theme),
            ids: Arc::new(IdAllocator::new()),
            events: None,
        }
    }

    /// Attaches a structured event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// The theme every diagram is drawn with.
    #[must_use]
    pub fn theme(&self) -> &DiagramTheme {
        &self.theme
    }

    /// The shared id allocator.
    #[must_use]
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// The configured event sink, if any.
    #[must_use]
    pub fn events(&self) -> Option<&Arc<EventEmitter>> {
        self.events.as_ref()
    }

    /// Renders one descriptor synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError`] when the description is not a well-formed
    /// flowchart or the engine fails on it.
    pub fn render(&self, descriptor: &DiagramDescriptor) -> Result<RenderedDiagram, DiagramError> {
        check::check(&descriptor.source)?;

        let theme = self.theme.to_engine_theme();
        let config = LayoutConfig::default();
        let source = descriptor.source.as_str();

        // The engine is third-party code running on slide text; a panic in it
        // fails this diagram only.
        let drawn = panic::catch_unwind(AssertUnwindSafe(|| {
            let parsed = parse_mermaid(source).map_err(|e| DiagramError::Render(e.to_string()))?;
            let layout = compute_layout(&parsed.graph, &theme, &config);
            let svg = render_svg(&layout, &theme, &config);
            Ok::<_, DiagramError>((svg, layout.nodes.len(), layout.edges.len()))
        }))
        .map_err(|_| DiagramError::Render("layout engine panicked".to_string()))??;
        let (svg, nodes, edges) = drawn;

        Ok(RenderedDiagram {
            id: descriptor.id.clone(),
            svg: scope::scope_svg(&svg, &descriptor.id),
            nodes,
            edges,
        })
    }

    async fn render_deferred(
        &self,
        descriptor: &DiagramDescriptor,
    ) -> Result<RenderedDiagram, DiagramError> {
        // One step per diagram on the event loop; other tasks run in between.
        tokio::task::yield_now().await;
        self.render(descriptor)
    }

    /// Renders every pending placeholder of `region`, one at a time in
    /// document order.
    ///
    /// Passes over the same region are serialized. Placeholders that are
    /// already rendered or failed are skipped, so repeated passes allocate
    /// no ids. A render that finishes after `cancel` fires, after the
    /// region was detached, or after its content was replaced is discarded
    /// without writing.
    pub async fn render_pending(
        &self,
        region: &SlideRegion,
        cancel: &CancellationToken,
    ) -> PassReport {
        let _gate = region.pass_gate().lock().await;
        let generation = region.generation();
        let mut report = PassReport::default();

        loop {
            if cancel.is_cancelled() || !region.is_attached() {
                self.abandon(&mut report, region, AbandonReason::Unmounted);
                break;
            }

            let Some(pending) = region.next_pending(generation) else {
                if region.generation() != generation {
                    self.abandon(&mut report, region, AbandonReason::ContentReplaced);
                }
                break;
            };

            let descriptor = DiagramDescriptor {
                id: self.ids.allocate(),
                source: pending.source,
            };

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                result = self.render_deferred(&descriptor) => Some(result),
            };
            let Some(result) = result else {
                self.abandon(&mut report, region, AbandonReason::Unmounted);
                break;
            };

            let state = match &result {
                Ok(rendered) => PlaceholderState::Rendered {
                    id: rendered.id.clone(),
                    svg: rendered.svg.clone(),
                },
                Err(e) => PlaceholderState::Failed {
                    id: descriptor.id.clone(),
                    message: e.to_string(),
                },
            };

            match region.commit(generation, pending.index, state) {
                CommitOutcome::Written => {}
                CommitOutcome::Detached => {
                    self.abandon(&mut report, region, AbandonReason::Unmounted);
                    break;
                }
                CommitOutcome::Stale => {
                    self.abandon(&mut report, region, AbandonReason::ContentReplaced);
                    break;
                }
            }

            match result {
                Ok(rendered) => {
                    tracing::debug!(
                        diagram_id = %rendered.id,
                        nodes = rendered.nodes,
                        edges = rendered.edges,
                        "diagram rendered"
                    );
                    self.emit(Event::DiagramRendered {
                        timestamp: Utc::now(),
                        diagram_id: rendered.id.to_string(),
                        nodes: rendered.nodes,
                        edges: rendered.edges,
                    });
                    report.rendered.push(rendered.id);
                }
                Err(e) => {
                    tracing::warn!(diagram_id = %descriptor.id, error = %e, "diagram failed to render");
                    self.emit(Event::DiagramFailed {
                        timestamp: Utc::now(),
                        diagram_id: descriptor.id.to_string(),
                        error: e.to_string(),
                    });
                    report.failed.push(descriptor.id);
                }
            }
        }

        report
    }

    fn abandon(&self, report: &mut PassReport, region: &SlideRegion, reason: AbandonReason) {
        let pending = region.pending_count();
        tracing::debug!(reason = reason.as_str(), pending, "diagram pass abandoned");
        self.emit(Event::PassAbandoned {
            timestamp: Utc::now(),
            reason: reason.as_str().to_string(),
            pending,
        });
        report.abandoned = Some(reason);
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}
