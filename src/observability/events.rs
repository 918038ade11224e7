//! Structured event stream for `slidedeck`.
//!
//! Discrete, typed events emitted while slides mount and their diagram
//! passes run. Events are serialized as newline-delimited JSON (JSONL) and
//! carry a monotonically increasing sequence number for ordering.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a page render.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A slide was mounted and its content painted.
    SlideMounted {
        /// When the slide was mounted.
        timestamp: DateTime<Utc>,
        /// Zero-based position of the slide in the deck.
        slide_index: usize,
        /// Slide title.
        title: String,
        /// Number of diagram placeholders in the painted content.
        diagrams: usize,
    },

    /// A diagram placeholder was replaced with its rendered graphic.
    DiagramRendered {
        /// When the graphic was written.
        timestamp: DateTime<Utc>,
        /// Session-unique diagram id (e.g. `"mermaid-0"`).
        diagram_id: String,
        /// Number of nodes in the diagram.
        nodes: usize,
        /// Number of edges in the diagram.
        edges: usize,
    },

    /// A diagram failed to render; its placeholder stays unrendered.
    DiagramFailed {
        /// When the failure was recorded.
        timestamp: DateTime<Utc>,
        /// Session-unique diagram id assigned to the failed placeholder.
        diagram_id: String,
        /// Human-readable failure reason.
        error: String,
    },

    /// A diagram pass stopped early because its slide went away.
    PassAbandoned {
        /// When the pass stopped.
        timestamp: DateTime<Utc>,
        /// Why the pass stopped (`"unmounted"` or `"content_replaced"`).
        reason: String,
        /// Placeholders still pending when the pass stopped.
        pending: usize,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are dropped so a broken
/// event sink never interrupts a render.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
