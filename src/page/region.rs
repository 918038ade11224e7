//! The DOM-like region a mounted slide owns.
//!
//! A region holds rendered content nodes plus one slot per diagram
//! placeholder. The diagram pass reads pending slots and writes results back
//! through [`SlideRegion::commit`], which refuses writes into a detached
//! region or into content that has since been replaced.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::content::{ContentNode, RenderedContent, plain_block};
use crate::diagram::DiagramId;
use crate::escape::escape_xml;

/// Render state of one diagram placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderState {
    /// Not yet visited by a pass; shows its source text.
    Pending,
    /// Replaced with the rendered graphic.
    Rendered {
        /// Id the graphic was rendered under.
        id: DiagramId,
        /// The `<svg>` element.
        svg: String,
    },
    /// Rendering failed; the source text stays displayed.
    Failed {
        /// Id consumed by the failed attempt.
        id: DiagramId,
        /// Failure reason.
        message: String,
    },
}

impl PlaceholderState {
    /// True while no pass has rendered this placeholder.
    #[must_use]
    pub const fn is_unrendered(&self) -> bool {
        !matches!(self, Self::Rendered { .. })
    }
}

/// A pending placeholder handed to the diagram pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlaceholder {
    /// Position among the region's placeholders.
    pub index: usize,
    /// Diagram description text.
    pub source: String,
}

/// Result of writing a placeholder state back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The state was stored.
    Written,
    /// The region was detached; nothing was written.
    Detached,
    /// The content was replaced since the pass started; nothing was written.
    Stale,
}

#[derive(Debug)]
struct Placeholder {
    source: String,
    state: PlaceholderState,
}

#[derive(Debug)]
struct RegionState {
    nodes: Vec<ContentNode>,
    placeholders: Vec<Placeholder>,
    generation: u64,
    attached: bool,
}

/// Content region owned by one mounted slide.
#[derive(Debug)]
pub struct SlideRegion {
    state: Mutex<RegionState>,
    pass_gate: tokio::sync::Mutex<()>,
}

impl SlideRegion {
    /// Creates an attached region showing `content`.
    #[must_use]
    pub fn new(content: RenderedContent) -> Self {
        let placeholders = placeholders_of(&content);
        Self {
            state: Mutex::new(RegionState {
                nodes: content.nodes,
                placeholders,
                generation: 0,
                attached: true,
            }),
            pass_gate: tokio::sync::Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock held by a running pass; serializes passes over this region.
    #[must_use]
    pub const fn pass_gate(&self) -> &tokio::sync::Mutex<()> {
        &self.pass_gate
    }

    /// Replaces the region's content; every placeholder starts over as
    /// pending and in-flight renders for the old content become stale.
    pub fn replace_content(&self, content: RenderedContent) {
        let placeholders = placeholders_of(&content);
        let mut state = self.lock();
        state.nodes = content.nodes;
        state.placeholders = placeholders;
        state.generation += 1;
    }

    /// Marks the region as no longer in the page.
    pub fn detach(&self) {
        self.lock().attached = false;
    }

    /// False once [`detach`](Self::detach) was called.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Counter bumped by every content replacement.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// First pending placeholder in document order, if the region is still
    /// attached and still at `generation`.
    #[must_use]
    pub fn next_pending(&self, generation: u64) -> Option<PendingPlaceholder> {
        let state = self.lock();
        if !state.attached || state.generation != generation {
            return None;
        }
        state
            .placeholders
            .iter()
            .position(|p| p.state == PlaceholderState::Pending)
            .map(|index| PendingPlaceholder {
                index,
                source: state.placeholders[index].source.clone(),
            })
    }

    /// Writes a placeholder's new state unless the region was detached or
    /// its content replaced after `generation`.
    pub fn commit(&self, generation: u64, index: usize, new_state: PlaceholderState) -> CommitOutcome {
        let mut state = self.lock();
        if !state.attached {
            return CommitOutcome::Detached;
        }
        if state.generation != generation {
            return CommitOutcome::Stale;
        }
        match state.placeholders.get_mut(index) {
            Some(placeholder) => {
                placeholder.state = new_state;
                CommitOutcome::Written
            }
            None => CommitOutcome::Stale,
        }
    }

    /// Number of placeholders still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock()
            .placeholders
            .iter()
            .filter(|p| p.state == PlaceholderState::Pending)
            .count()
    }

    /// Current state of every placeholder in document order.
    #[must_use]
    pub fn placeholder_states(&self) -> Vec<PlaceholderState> {
        self.lock().placeholders.iter().map(|p| p.state.clone()).collect()
    }

    /// Serializes the region as HTML.
    ///
    /// Unrendered placeholders show their source in a
    /// `<pre class="language-mermaid">` block; rendered ones show the SVG.
    #[must_use]
    pub fn to_html(&self) -> String {
        let state = self.lock();
        let mut html = String::new();
        let mut placeholders = state.placeholders.iter();

        for node in &state.nodes {
            match node {
                ContentNode::Html(fragment) => html.push_str(fragment),
                ContentNode::Diagram { source } => match placeholders.next().map(|p| &p.state) {
                    Some(PlaceholderState::Rendered { id, svg }) => {
                        html.push_str(&format!(
                            "<div class=\"mermaid-rendered\" data-diagram-id=\"{}\">{svg}</div>\n",
                            escape_xml(id.as_str())
                        ));
                    }
                    Some(PlaceholderState::Failed { id, message }) => {
                        html.push_str(&format!(
                            "<pre class=\"language-mermaid mermaid-failed\" data-diagram-id=\"{}\" title=\"{}\"><code>{}</code></pre>\n",
                            escape_xml(id.as_str()),
                            escape_xml(message),
                            escape_xml(source)
                        ));
                    }
                    Some(PlaceholderState::Pending) => {
                        html.push_str(&format!(
                            "<pre class=\"language-mermaid\"><code>{}</code></pre>\n",
                            escape_xml(source)
                        ));
                    }
                    None => {
                        html.push_str(&plain_block(source));
                        html.push('\n');
                    }
                },
            }
        }

        html
    }
}

fn placeholders_of(content: &RenderedContent) -> Vec<Placeholder> {
    content
        .diagram_sources()
        .map(|source| Placeholder {
            source: source.to_string(),
            state: PlaceholderState::Pending,
        })
        .collect()
}
