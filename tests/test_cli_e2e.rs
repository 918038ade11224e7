mod common;

use common::{arg, deck_dir, path_in, run_slidedeck};

const DECK: &str = r##"
metadata:
  title: Shipping Rust
  description: Release pipeline walkthrough
theme:
  primary_color: "#2b6cb0"
slides:
  - kind: title
    title: Shipping Rust
    presenter: Dana
    date: 2026-03-12
  - kind: markdown
    title: Pipeline
    body: |
      ```mermaid
      flowchart TD
       A[Push code] --> B[Build]
      ```

      ```rust
      fn main() {}
      ```
  - kind: markdown
    title: Rollout
    body_file: rollout.md
"##;

const ROLLOUT: &str = "## Steps\n\n```mermaid\ngraph LR\n Canary --> Fleet\n```\n";

const BROKEN_DIAGRAM: &str = r"
metadata:
  title: Broken
slides:
  - kind: markdown
    title: Oops
    body: |
      ```mermaid
      flowchart TD
       A[Push code --> B
      ```
";

const BAD_CONFIG: &str = r"
metadata:
  title: Bad
slides:
  - kind: markdown
    title: Missing body
    colour: red
";

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============================================================================
// Version & completions
// ============================================================================

#[test]
fn version_human() {
    let output = run_slidedeck(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("slidedeck "));
}

#[test]
fn version_json() {
    let output = run_slidedeck(&["version", "--format", "json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["name"], "slidedeck");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn completions_bash() {
    let output = run_slidedeck(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("slidedeck"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = run_slidedeck(&["present"]);
    assert!(!output.status.success());
}

// ============================================================================
// render
// ============================================================================

#[test]
fn render_writes_page_with_diagrams() {
    let dir = deck_dir(&[("deck.yaml", DECK), ("rollout.md", ROLLOUT)]);
    let deck = path_in(&dir, "deck.yaml");
    let out = path_in(&dir, "deck.html");
    let events = path_in(&dir, "events.jsonl");

    let output = run_slidedeck(&[
        "-q",
        "render",
        arg(&deck),
        "-o",
        arg(&out),
        "--events-file",
        arg(&events),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Shipping Rust</title>"));
    assert!(html.contains("<svg id=\"mermaid-0\""));
    assert!(html.contains("<svg id=\"mermaid-1\""));
    assert!(!html.contains("mermaid-2"));
    assert!(html.contains("fill=\"#2b6cb0\""));
    assert!(html.contains("data-language=\"rust\""));
    assert!(html.contains("March 12, 2026"));

    let events = std::fs::read_to_string(&events).unwrap();
    let rendered = events
        .lines()
        .filter(|line| line.contains("\"DiagramRendered\""))
        .count();
    assert_eq!(rendered, 2);
}

#[test]
fn render_broken_diagram_still_succeeds_by_default() {
    let dir = deck_dir(&[("deck.yaml", BROKEN_DIAGRAM)]);
    let output = run_slidedeck(&["-q", "render", arg(&path_in(&dir, "deck.yaml"))]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("mermaid-failed"));
}

#[test]
fn render_fail_on_diagram_error_exit_code() {
    let dir = deck_dir(&[("deck.yaml", BROKEN_DIAGRAM)]);
    let output = run_slidedeck(&[
        "-q",
        "render",
        arg(&path_in(&dir, "deck.yaml")),
        "--fail-on-diagram-error",
    ]);
    assert_eq!(output.status.code(), Some(4));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_good_deck() {
    let dir = deck_dir(&[("deck.yaml", DECK), ("rollout.md", ROLLOUT)]);
    let output = run_slidedeck(&["-q", "validate", arg(&path_in(&dir, "deck.yaml")), "-f", "json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["valid"], true);
    assert_eq!(json[0]["slides"], 3);
    assert_eq!(json[0]["diagrams"], 2);
}

#[test]
fn validate_broken_diagram_exit_code() {
    let dir = deck_dir(&[("deck.yaml", BROKEN_DIAGRAM)]);
    let output = run_slidedeck(&["-q", "validate", arg(&path_in(&dir, "deck.yaml"))]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stdout(&output).contains("unterminated '['"));
}

#[test]
fn validate_bad_config_exit_code() {
    let dir = deck_dir(&[("deck.yaml", BAD_CONFIG)]);
    let output = run_slidedeck(&["-q", "validate", arg(&path_in(&dir, "deck.yaml"))]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn validate_missing_file_exit_code() {
    let output = run_slidedeck(&["-q", "validate", "/nonexistent/deck.yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// outline & diagram
// ============================================================================

#[test]
fn outline_json_lists_blocks() {
    let dir = deck_dir(&[("deck.yaml", DECK), ("rollout.md", ROLLOUT)]);
    let output = run_slidedeck(&["-q", "outline", arg(&path_in(&dir, "deck.yaml")), "--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let slides = json.as_array().unwrap();
    assert_eq!(slides.len(), 3);
    let pipeline = slides[1]["blocks"].as_array().unwrap();
    assert_eq!(pipeline[0]["kind"], "fenced_code");
    assert_eq!(pipeline[0]["strategy"]["strategy"], "diagram");
    assert_eq!(pipeline[1]["strategy"]["tag"], "rust");
}

#[test]
fn diagram_to_svg_file() {
    let dir = deck_dir(&[("flow.mmd", "flowchart LR\n A[Push code] --> B[Build]\n")]);
    let out = path_in(&dir, "flow.svg");
    let output = run_slidedeck(&["-q", "diagram", arg(&path_in(&dir, "flow.mmd")), "-o", arg(&out)]);
    assert!(output.status.success());

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg id=\"mermaid-0\""));
    assert!(svg.contains(">Push code<"));
}

#[test]
fn diagram_syntax_error_exit_code() {
    let dir = deck_dir(&[("flow.mmd", "sequenceDiagram\n A->>B: hi\n")]);
    let output = run_slidedeck(&["-q", "diagram", arg(&path_in(&dir, "flow.mmd"))]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn demo_deck_validates() {
    let deck = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/webinar.yaml");
    let output = run_slidedeck(&["-q", "validate", deck, "--strict", "-f", "json"]);
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["diagrams"], 1);
}
