use std::time::Duration;

use chrono::Duration as ChronoDuration;
use healthmonitor_core::bus::InMemoryPublisher;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn emits_at_least_one_cleanup_message_then_stops_on_shutdown() {
    let bus = InMemoryPublisher::new();
    let emitter = CronEmitter::new(bus, Duration::from_millis(10), ChronoDuration::days(7));
    let shutdown = CancellationToken::new();

    let shutdown_clone = shutdown.clone();
    let handle = tokio::spawn(async move {
        emitter.run(shutdown_clone).await;
        emitter
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();
    let emitter = handle.await.expect("cron task join");

    let published = emitter.bus.published();
    assert!(!published.is_empty(), "expected at least one cleanup tick");
    assert!(published.iter().all(|msg| msg.starts_with("cleanup_")));
}

#[tokio::test]
async fn immediate_shutdown_emits_nothing() {
    let bus = InMemoryPublisher::new();
    let emitter = CronEmitter::new(bus, Duration::from_secs(3600), ChronoDuration::days(7));
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    emitter.run(shutdown).await;

    assert!(emitter.bus.published().is_empty());
}
