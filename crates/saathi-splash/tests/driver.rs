//! Integration tests for the Tokio splash runner
//!
//! All tests run on a paused clock: Tokio advances time straight to the next
//! timer deadline, so cadence and grace-delay timings are exact.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

use saathi_core::{Percent, SplashConfig, SplashError, SplashPhase};
use saathi_splash::{SplashHandle, SplashOutcome, spawn_splash};

/// Spawn a run whose callback bumps a shared counter
fn counted(config: SplashConfig) -> (SplashHandle, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handle = assert_ok!(spawn_splash(config, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    (handle, calls)
}

/// Collect distinct published percentages until the run ends
async fn collect_progress(handle: &SplashHandle) -> Vec<u8> {
    let mut updates = handle.subscribe();
    let mut seen = Vec::new();
    while updates.changed().await.is_ok() {
        let snapshot = *updates.borrow_and_update();
        if seen.last() != Some(&snapshot.percent.value()) {
            seen.push(snapshot.percent.value());
        }
        if snapshot.phase.is_terminal() {
            break;
        }
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_default_run() {
    let start = Instant::now();
    let (done_tx, done_rx) = oneshot::channel();
    let handle = assert_ok!(spawn_splash(SplashConfig::default(), move || {
        let _ = done_tx.send(Instant::now());
    }));

    let seen = collect_progress(&handle).await;
    let expected: Vec<u8> = (1..=50).map(|i| i * 2).collect();
    assert_eq!(seen, expected);

    // 50 ticks at 60ms, then the 300ms grace delay
    let completed_at = done_rx.await.unwrap();
    assert_eq!(completed_at - start, Duration::from_millis(3300));

    assert_eq!(handle.snapshot().ticks, 50);
    assert_eq!(handle.finished().await, SplashOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_uneven_step_clamps_to_100() {
    let start = Instant::now();
    let (done_tx, done_rx) = oneshot::channel();
    let config = SplashConfig::default().with_duration_ms(100).with_step(33);
    let handle = assert_ok!(spawn_splash(config, move || {
        let _ = done_tx.send(Instant::now());
    }));

    assert_eq!(collect_progress(&handle).await, vec![33, 66, 99, 100]);

    let completed_at = done_rx.await.unwrap();
    assert_eq!(completed_at - start, Duration::from_millis(4 * 33 + 300));
    assert_eq!(handle.finished().await, SplashOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_completion_fires_exactly_once() {
    for (duration_ms, step) in [(100, 1), (300, 3), (700, 7), (50, 50), (10, 100)] {
        let config = SplashConfig::default()
            .with_duration_ms(duration_ms)
            .with_step(step);
        let (handle, calls) = counted(config);

        let mut updates = handle.subscribe();
        let mut last = Percent::ZERO;
        while updates.changed().await.is_ok() {
            let snapshot = *updates.borrow_and_update();
            assert!(snapshot.percent >= last, "progress went backwards");
            last = snapshot.percent;
            if snapshot.phase.is_terminal() {
                break;
            }
        }
        assert_eq!(last, Percent::MAX);
        assert_eq!(handle.finished().await, SplashOutcome::Completed);

        // Nothing else may fire once the run is over
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "step {step}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_done_is_published_after_callback_returns() {
    let returned = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&returned);
    let config = SplashConfig::default().with_duration_ms(10).with_step(50);
    let handle = assert_ok!(spawn_splash(config, move || {
        // A slow host callback; the host must not see Done before it ends
        std::thread::sleep(Duration::from_millis(50));
        flag.store(true, Ordering::SeqCst);
    }));

    let mut updates = handle.subscribe();
    while updates.changed().await.is_ok() {
        let snapshot = *updates.borrow_and_update();
        if snapshot.phase == SplashPhase::Done {
            assert!(returned.load(Ordering::SeqCst), "Done seen before callback returned");
            break;
        }
    }

    // Losing to completion leaves the run completed
    handle.cancel();
    assert_eq!(handle.finished().await, SplashOutcome::Completed);
    assert!(returned.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_reduced_motion_completes_synchronously() {
    let (handle, calls) = counted(SplashConfig::default().with_reduced_motion(true));

    // No await between spawn and these checks
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(handle.percent(), Percent::MAX);
    assert_eq!(handle.phase(), SplashPhase::Done);
    assert_eq!(handle.snapshot().ticks, 0);

    assert_eq!(handle.finished().await, SplashOutcome::Completed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_running() {
    let (handle, calls) = counted(SplashConfig::default());

    // Ticks at 60ms and 120ms
    tokio::time::sleep(Duration::from_millis(130)).await;
    assert_eq!(handle.percent(), Percent::new(4));

    handle.cancel();
    assert!(handle.is_cancelled());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.percent(), Percent::new(4));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(handle.finished().await, SplashOutcome::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_racing_a_due_tick() {
    let (handle, calls) = counted(SplashConfig::default());

    // Wake on the same instant as the second tick; either may run first
    tokio::time::sleep(Duration::from_millis(120)).await;
    handle.cancel();
    let frozen = handle.percent();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.percent(), frozen);
    assert_eq!(handle.phase(), SplashPhase::Cancelled);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_grace_delay() {
    let (handle, calls) = counted(SplashConfig::default().with_duration_ms(100).with_step(50));

    // Ticks at 50ms and 100ms, grace delay until 400ms
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(handle.phase(), SplashPhase::Completing);
    assert_eq!(handle.percent(), Percent::MAX);

    handle.cancel();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(handle.finished().await, SplashOutcome::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_tears_down() {
    let (handle, calls) = counted(SplashConfig::default());
    let updates = handle.subscribe();

    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(handle);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(updates.borrow().phase, SplashPhase::Cancelled);
    assert_eq!(updates.borrow().percent, Percent::new(2));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_completion_is_noop() {
    let (handle, calls) = counted(SplashConfig::brisk());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(handle.phase(), SplashPhase::Done);

    handle.cancel();
    assert_eq!(handle.phase(), SplashPhase::Done);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(handle.finished().await, SplashOutcome::Completed);
}

#[tokio::test]
async fn test_invalid_config_fails_fast() {
    let err = assert_err!(spawn_splash(SplashConfig::default().with_step(0), || {}));
    assert!(matches!(err, SplashError::Config(_)));

    let err = assert_err!(spawn_splash(SplashConfig::default().with_step(250), || {}));
    assert!(err.to_string().contains("250"));
}
