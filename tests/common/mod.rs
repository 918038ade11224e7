//! Shared integration-test harness: deck fixtures, an in-memory event sink,
//! and a helper for running the `slidedeck` binary.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use slidedeck::observability::EventEmitter;

/// Two-node diagram from the deployment slide.
pub const PUSH_BUILD: &str = "flowchart TD\n A[Push code] --> B[Build]";

/// Diagram whose first node label is never closed.
pub const UNTERMINATED: &str = "flowchart TD\n A[Push code --> B";

/// Wraps a diagram description in a mermaid fence.
pub fn mermaid(source: &str) -> String {
    format!("```mermaid\n{source}\n```\n")
}

// ============================================================================
// Events
// ============================================================================

/// In-memory writer for capturing emitter output.
#[derive(Clone, Default)]
pub struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl TestWriter {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Parsed JSONL events.
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// Parsed events of one `type`.
    pub fn events_of(&self, kind: &str) -> Vec<serde_json::Value> {
        self.events()
            .into_iter()
            .filter(|event| event["type"] == kind)
            .collect()
    }
}

impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// An emitter writing into a fresh [`TestWriter`].
pub fn capture_events() -> (Arc<EventEmitter>, TestWriter) {
    let writer = TestWriter::default();
    let emitter = Arc::new(EventEmitter::new(Box::new(writer.clone())));
    (emitter, writer)
}

// ============================================================================
// Deck fixtures
// ============================================================================

/// Writes `files` into a fresh temp dir and returns it.
pub fn deck_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

/// Path of `name` inside `dir`.
pub fn path_in(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Binary
// ============================================================================

/// Runs the `slidedeck` binary with `args` and waits for it.
#[allow(clippy::missing_panics_doc)]
pub fn run_slidedeck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slidedeck"))
        .args(args)
        .env_remove("SLIDEDECK_LOG_LEVEL")
        .output()
        .expect("failed to spawn slidedeck")
}

/// Path argument as `&str`.
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("non-UTF-8 path")
}
