mod common;

use std::sync::Arc;

use common::{PUSH_BUILD, UNTERMINATED, capture_events, mermaid};
use slidedeck::content::ContentRenderer;
use slidedeck::diagram::{AbandonReason, DiagramRenderer, DiagramTheme};
use slidedeck::page::{MountedSlide, PlaceholderState, Slide, SlideRegion};
use tokio_util::sync::CancellationToken;

fn renderer() -> DiagramRenderer {
    DiagramRenderer::new(DiagramTheme::default())
}

fn mount(index: usize, body: &str, diagrams: &DiagramRenderer) -> MountedSlide {
    MountedSlide::mount(
        index,
        Arc::new(Slide::markdown(format!("Slide {index}"), body)),
        ContentRenderer::default(),
        diagrams.clone(),
    )
}

// ============================================================================
// Identifier allocation
// ============================================================================

#[tokio::test]
async fn no_diagrams_no_ids() {
    let diagrams = renderer();
    let mut slide = mount(0, "# Agenda\n\n- Why Rust\n- Demo\n\n```rust\nfn main() {}\n```\n", &diagrams);
    for _ in 0..3 {
        slide.rerender();
    }
    let report = slide.settle().await;

    assert!(report.is_empty());
    assert_eq!(diagrams.ids().allocated(), 0);
}

#[tokio::test]
async fn n_diagrams_n_ids_across_rerenders() {
    let diagrams = renderer();
    let body = format!(
        "{}\ntext\n\n{}\n{}",
        mermaid(PUSH_BUILD),
        mermaid("graph LR\n C --> D"),
        mermaid("graph TD\n E{ok?} -->|yes| F")
    );
    let mut slide = mount(0, &body, &diagrams);

    // re-render before, during, and after the first pass
    slide.rerender();
    slide.rerender();
    let mut report = slide.settle().await;
    for _ in 0..4 {
        slide.rerender();
    }
    report.merge(slide.settle().await);

    assert_eq!(diagrams.ids().allocated(), 3);
    let ids: Vec<&str> = report.rendered.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["mermaid-0", "mermaid-1", "mermaid-2"]);
    assert!(slide
        .placeholder_states()
        .iter()
        .all(|state| matches!(state, PlaceholderState::Rendered { .. })));
}

#[tokio::test]
async fn rerun_over_rendered_region_changes_nothing() {
    let diagrams = renderer();
    let region = SlideRegion::new(ContentRenderer::default().render(&mermaid(PUSH_BUILD)));
    let cancel = CancellationToken::new();

    diagrams.render_pending(&region, &cancel).await;
    let html = region.to_html();
    let states = region.placeholder_states();

    let report = diagrams.render_pending(&region, &cancel).await;
    assert!(report.is_empty());
    assert_eq!(region.to_html(), html);
    assert_eq!(region.placeholder_states(), states);
    assert_eq!(diagrams.ids().allocated(), 1);
}

#[tokio::test]
async fn push_build_end_to_end() {
    let diagrams = renderer();
    let body = format!("{}\n{}", mermaid(PUSH_BUILD), mermaid("graph TD\n X --> Y"));
    let mut slide = mount(0, &body, &diagrams);
    slide.settle().await;

    let html = slide.html();
    assert!(html.contains("<div class=\"mermaid-rendered\" data-diagram-id=\"mermaid-0\"><svg id=\"mermaid-0\""));
    assert!(html.contains("<div class=\"mermaid-rendered\" data-diagram-id=\"mermaid-1\"><svg id=\"mermaid-1\""));
    assert!(html.contains(">Push code<"));
    assert!(html.contains(">Build<"));
    assert!(!html.contains("language-mermaid"));
}

#[tokio::test]
async fn ids_continue_across_slides() {
    let diagrams = renderer();
    let mut first = mount(0, &mermaid(PUSH_BUILD), &diagrams);
    first.settle().await;
    first.unmount();

    let mut second = mount(1, &mermaid(PUSH_BUILD), &diagrams);
    let report = second.settle().await;
    assert_eq!(report.rendered[0].as_str(), "mermaid-1");
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn malformed_diagram_one_diagnostic_siblings_render() {
    let (events, sink) = capture_events();
    let diagrams = renderer().with_events(events);
    let body = format!(
        "{}\n{}\n{}",
        mermaid(PUSH_BUILD),
        mermaid(UNTERMINATED),
        mermaid("graph LR\n C --> D")
    );
    let mut slide = mount(0, &body, &diagrams);
    let report = slide.settle().await;
    slide.rerender();
    slide.settle().await;

    let failed = sink.events_of("DiagramFailed");
    assert_eq!(failed.len(), 1, "exactly one diagnostic: {}", sink.contents());
    assert_eq!(failed[0]["diagram_id"], "mermaid-1");
    assert!(failed[0]["error"].as_str().unwrap().contains("unterminated '['"));

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.rendered.len(), 2);
    let states = slide.placeholder_states();
    assert!(matches!(states[0], PlaceholderState::Rendered { .. }));
    assert!(matches!(states[1], PlaceholderState::Failed { .. }));
    assert!(matches!(states[2], PlaceholderState::Rendered { .. }));

    // the failed placeholder still shows its source
    assert!(slide.html().contains("A[Push code --&gt; B"));
    assert_eq!(diagrams.ids().allocated(), 3);
}

#[tokio::test]
async fn second_diagram_independent_of_first_failure() {
    let diagrams = renderer();
    let body = format!("{}\n{}", mermaid(UNTERMINATED), mermaid(PUSH_BUILD));
    let mut slide = mount(0, &body, &diagrams);
    let report = slide.settle().await;

    assert_eq!(report.failed[0].as_str(), "mermaid-0");
    assert_eq!(report.rendered[0].as_str(), "mermaid-1");
}

#[tokio::test]
async fn events_record_mount_and_renders() {
    let (events, sink) = capture_events();
    let diagrams = renderer().with_events(events);
    let mut slide = mount(2, &mermaid(PUSH_BUILD), &diagrams);
    slide.settle().await;

    let mounted = sink.events_of("SlideMounted");
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0]["slide_index"], 2);
    assert_eq!(mounted[0]["diagrams"], 1);

    let rendered = sink.events_of("DiagramRendered");
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0]["nodes"], 2);
    assert_eq!(rendered[0]["edges"], 1);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn unmount_abandons_pass_without_writing() {
    let (events, sink) = capture_events();
    let diagrams = renderer().with_events(events);
    let slide = mount(0, &format!("{}\n{}", mermaid(PUSH_BUILD), mermaid(PUSH_BUILD)), &diagrams);
    let region = Arc::clone(slide.region());
    slide.unmount();

    // let the spawned pass observe the cancellation
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    assert_eq!(region.pending_count(), 2);
    assert!(region.placeholder_states().iter().all(|s| *s == PlaceholderState::Pending));
    let abandoned = sink.events_of("PassAbandoned");
    assert_eq!(abandoned.len(), 1);
    assert_eq!(abandoned[0]["reason"], "unmounted");
    assert!(sink.events_of("DiagramRendered").is_empty());
}

#[tokio::test]
async fn cancel_mid_pass_stops_writes() {
    let diagrams = renderer();
    let region = Arc::new(SlideRegion::new(
        ContentRenderer::default().render(&format!("{}\n{}", mermaid(PUSH_BUILD), mermaid(PUSH_BUILD))),
    ));
    let cancel = CancellationToken::new();

    let pass = {
        let diagrams = diagrams.clone();
        let region = Arc::clone(&region);
        let cancel = cancel.clone();
        tokio::spawn(async move { diagrams.render_pending(&region, &cancel).await })
    };

    tokio::task::yield_now().await;
    cancel.cancel();
    region.detach();
    let frozen = region.to_html();
    let report = pass.await.unwrap();

    // nothing lands after cancellation, and committed work stays
    assert_eq!(region.to_html(), frozen);
    assert_eq!(report.rendered.len() + region.pending_count(), 2);
    assert!(report.failed.is_empty());
    if region.pending_count() > 0 {
        assert_eq!(report.abandoned, Some(AbandonReason::Unmounted));
    }
}

#[tokio::test]
async fn content_replacement_discards_stale_renders() {
    let diagrams = renderer();
    let mut slide = mount(0, &mermaid(PUSH_BUILD), &diagrams);

    // replace before the first pass gets to run
    slide.update(Arc::new(Slide::markdown(
        "Slide 0",
        mermaid("graph LR\n New --> Content"),
    )));
    let report = slide.settle().await;

    assert_eq!(report.rendered.len(), 1);
    let html = slide.html();
    assert!(html.contains(">New<"));
    assert!(!html.contains(">Push code<"));
    assert_eq!(slide.placeholder_states().len(), 1);
}
