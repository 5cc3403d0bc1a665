#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::time::Duration;

use common::RecordingContext;
use snipcat_core::preview::{
    CodeSupplier, PreviewDriver, PreviewHandle, PreviewRenderer, DEFAULT_DEBOUNCE,
};
use snipcat_core::SnippetCode;

fn html(text: &str) -> SnippetCode {
    SnippetCode::new(format!("<p>{}</p>", text), "", "")
}

/// Spawn a driver and wait until it has rendered the supplier's initial value
async fn spawn_settled(
    context: &RecordingContext,
    supplier: &CodeSupplier,
    debounce: Duration,
) -> PreviewHandle {
    let handle = PreviewDriver::spawn(
        PreviewRenderer::new(context.clone()),
        supplier.subscribe(),
        debounce,
    );
    handle.rendered().wait_for(|g| *g == 1).await.unwrap();
    handle
}

#[tokio::test(start_paused = true)]
async fn test_initial_triple_rendered_on_spawn() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("first"));
    let handle = PreviewDriver::spawn(
        PreviewRenderer::new(context.clone()),
        supplier.subscribe(),
        DEFAULT_DEBOUNCE,
    );

    let mut rendered = handle.rendered();
    rendered.wait_for(|g| *g == 1).await.unwrap();
    assert!(context.loaded_sources()[0].contains("<p>first</p>"));
}

#[tokio::test(start_paused = true)]
async fn test_burst_collapses_to_latest() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("0"));
    let handle = spawn_settled(&context, &supplier, Duration::from_millis(120)).await;

    for i in 1..=5 {
        supplier.publish(html(&i.to_string()));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::time::sleep(Duration::from_millis(500)).await;

    let sources = context.loaded_sources();
    assert_eq!(sources.len(), 2, "initial render plus one for the burst");
    assert!(sources[1].contains("<p>5</p>"));
    assert_eq!(*handle.rendered().borrow(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_quiet_changes_each_render() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("0"));
    let _handle = spawn_settled(&context, &supplier, Duration::from_millis(120)).await;

    supplier.publish(html("a"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    supplier.publish(html("b"));
    tokio::time::sleep(Duration::from_millis(200)).await;

    let sources = context.loaded_sources();
    assert_eq!(sources.len(), 3);
    assert!(sources[1].contains("<p>a</p>"));
    assert!(sources[2].contains("<p>b</p>"));
}

#[tokio::test(start_paused = true)]
async fn test_zero_window_renders_every_observed_value() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("0"));
    let _handle = spawn_settled(&context, &supplier, Duration::ZERO).await;

    for i in 1..=3 {
        supplier.publish(html(&i.to_string()));
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(context.loaded_sources().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_revert_within_window_skips_render() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("same"));
    let _handle = spawn_settled(&context, &supplier, Duration::from_millis(120)).await;

    supplier.publish(html("other"));
    tokio::time::sleep(Duration::from_millis(10)).await;
    supplier.publish(html("same"));
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(context.loaded_sources().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_command_raises_pending() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("x"));
    let renderer =
        PreviewRenderer::new(context.clone()).with_refresh_delay(Duration::from_millis(300));
    let handle = PreviewDriver::spawn(renderer, supplier.subscribe(), DEFAULT_DEBOUNCE);

    let mut rendered = handle.rendered();
    rendered.wait_for(|g| *g == 1).await.unwrap();

    let mut pending = handle.pending();
    assert!(handle.refresh());
    pending.wait_for(|p| *p).await.unwrap();
    pending.wait_for(|p| !*p).await.unwrap();
    rendered.wait_for(|g| *g == 2).await.unwrap();

    let sources = context.loaded_sources();
    assert_eq!(sources[0], sources[1]);
}

#[tokio::test(start_paused = true)]
async fn test_closing_supplier_flushes_latest() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("0"));
    let handle = spawn_settled(&context, &supplier, Duration::from_secs(60)).await;
    let mut rendered = handle.rendered();

    supplier.publish(html("last"));
    drop(supplier);
    rendered.wait_for(|g| *g == 2).await.unwrap();

    assert!(context.loaded_sources()[1].contains("<p>last</p>"));
}

#[tokio::test(start_paused = true)]
async fn test_unmounted_driver_keeps_running() {
    let context = RecordingContext::unmounted();
    let supplier = CodeSupplier::new(html("0"));
    let handle = PreviewDriver::spawn(
        PreviewRenderer::new(context.clone()),
        supplier.subscribe(),
        Duration::ZERO,
    );

    supplier.publish(html("1"));
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(handle.refresh(), "driver survives failed renders");
    assert!(context.calls().is_empty());
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_remount_settles_on_triple_that_failed_while_unmounted() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("a"));
    let handle = spawn_settled(&context, &supplier, Duration::from_millis(120)).await;

    context.set_mounted(false);
    supplier.publish(html("b"));
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(context.loaded_sources().len(), 1, "unmounted render loads nothing");

    context.set_mounted(true);
    supplier.publish(html("x"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    supplier.publish(html("b"));
    tokio::time::sleep(Duration::from_millis(500)).await;

    let sources = context.loaded_sources();
    let shown = sources.last().unwrap();
    assert!(shown.contains("<p>b</p>"), "settled on the last supplied triple");
    assert_eq!(*handle.rendered().borrow(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_inside_window_renders_newest_triple_once() {
    let context = RecordingContext::mounted();
    let supplier = CodeSupplier::new(html("old"));
    let renderer =
        PreviewRenderer::new(context.clone()).with_refresh_delay(Duration::from_millis(300));
    let handle = PreviewDriver::spawn(renderer, supplier.subscribe(), Duration::from_millis(120));
    let mut rendered = handle.rendered();
    rendered.wait_for(|g| *g == 1).await.unwrap();

    supplier.publish(html("new"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(handle.refresh());
    rendered.wait_for(|g| *g == 2).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let sources = context.loaded_sources();
    assert_eq!(sources.len(), 2, "no stale refresh and no second render");
    assert!(sources[0].contains("<p>old</p>"));
    assert!(sources[1].contains("<p>new</p>"));
}
