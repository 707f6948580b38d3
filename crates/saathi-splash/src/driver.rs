//! Tokio runner for the progress simulator
//!
//! [`spawn_splash`] starts a run and hands back a [`SplashHandle`]. A
//! background task owns the recurring ticker and the grace-delay timer and
//! feeds their elapses into the [`ProgressSimulator`].
//!
//! The simulator sits behind a mutex shared with the handle. Every timer
//! callback takes the lock and lets the simulator decide, from its phase,
//! whether the callback is still live. Once [`SplashHandle::cancel`]
//! returns, a tick or grace timer that was already in flight finds the
//! phase `Cancelled` and does nothing.

use std::future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{Instrument, debug, info, info_span, warn};

use saathi_core::{
    Percent, ProgressSimulator, SplashAction, SplashConfig, SplashPhase, SplashResult,
    SplashSnapshot,
};

/// Host callback invoked once the splash has finished
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashOutcome {
    /// The completion callback ran
    Completed,
    /// The run was torn down first
    Cancelled,
}

/// State shared between the handle and the runner task
struct Shared {
    sim: Mutex<ProgressSimulator>,
    snapshot_tx: watch::Sender<SplashSnapshot>,
}

impl Shared {
    /// Run one simulator transition and publish the result, under the lock
    ///
    /// A transition that completes the run is not published here; the
    /// runner calls [`publish`](Self::publish) once the callback returned.
    fn transition<F>(&self, f: F) -> (Vec<SplashAction>, SplashPhase)
    where
        F: FnOnce(&mut ProgressSimulator) -> Vec<SplashAction>,
    {
        let mut sim = self.sim.lock();
        let actions = f(&mut sim);
        if !actions.is_empty() && !actions.contains(&SplashAction::Complete) {
            self.snapshot_tx.send_replace(sim.snapshot());
        }
        (actions, sim.phase())
    }

    fn publish(&self) {
        let sim = self.sim.lock();
        self.snapshot_tx.send_replace(sim.snapshot());
    }
}

/// Start a splash run
///
/// The configuration is validated before anything is scheduled. With
/// `reduced_motion` set, `on_complete` runs before this function returns
/// and no timer or task is created. Otherwise this must be called from
/// within a Tokio runtime.
pub fn spawn_splash<F>(config: SplashConfig, on_complete: F) -> SplashResult<SplashHandle>
where
    F: FnOnce() + Send + 'static,
{
    let mut sim = ProgressSimulator::new();
    let actions = sim.start(config)?;

    let (snapshot_tx, snapshot_rx) = watch::channel(sim.snapshot());
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let phase = sim.phase();
    let shared = Arc::new(Shared {
        sim: Mutex::new(sim),
        snapshot_tx,
    });

    let mut runner = SplashRunner {
        shared: Arc::clone(&shared),
        cancel_rx,
        ticker: None,
        grace: None,
        on_complete: Some(Box::new(on_complete)),
    };
    runner.apply(actions);

    let task = if phase.is_terminal() {
        None
    } else {
        let span = info_span!(
            "splash",
            duration_ms = config.duration_ms,
            step = config.step
        );
        Some(tokio::spawn(runner.run().instrument(span)))
    };

    Ok(SplashHandle {
        shared,
        snapshot_rx,
        cancel_tx,
        task,
    })
}

/// Host-side handle to a running splash
///
/// Dropping the handle tears the splash down, like calling
/// [`cancel`](Self::cancel).
pub struct SplashHandle {
    shared: Arc<Shared>,
    snapshot_rx: watch::Receiver<SplashSnapshot>,
    /// When `true` is sent, the runner drops its timers and exits
    cancel_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SplashHandle {
    /// Latest published state
    pub fn snapshot(&self) -> SplashSnapshot {
        *self.snapshot_rx.borrow()
    }

    pub fn percent(&self) -> Percent {
        self.snapshot().percent
    }

    pub fn phase(&self) -> SplashPhase {
        self.snapshot().phase
    }

    /// Receiver that wakes on every published change
    pub fn subscribe(&self) -> watch::Receiver<SplashSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Stop the run
    ///
    /// No progress change and no completion callback happens after this
    /// returns. Cancelling a finished run does nothing. The handle reports
    /// [`SplashPhase::Done`] only after the completion callback returned, so
    /// a cancel that loses to completion may briefly see `Completing`.
    pub fn cancel(&self) {
        let (actions, _) = self.shared.transition(ProgressSimulator::cancel);
        if !actions.is_empty() {
            debug!(?actions, "Splash cancel requested");
        }
        // The runner may already have exited; nothing to signal then.
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.phase() == SplashPhase::Cancelled
    }

    /// Wait for the run to end
    ///
    /// When this returns [`SplashOutcome::Completed`] the completion
    /// callback has already returned.
    pub async fn finished(mut self) -> SplashOutcome {
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Splash runner task failed");
        }
        match self.phase() {
            SplashPhase::Done => SplashOutcome::Completed,
            _ => SplashOutcome::Cancelled,
        }
    }
}

impl Drop for SplashHandle {
    fn drop(&mut self) {
        if !self.phase().is_terminal() {
            self.cancel();
        }
    }
}

impl std::fmt::Debug for SplashHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("SplashHandle")
            .field("phase", &snapshot.phase)
            .field("percent", &snapshot.percent)
            .finish()
    }
}

/// Why the runner woke up
enum Wake {
    Tick,
    Grace,
    Cancelled,
}

/// Background task owning the timers of one run
struct SplashRunner {
    shared: Arc<Shared>,
    cancel_rx: watch::Receiver<bool>,
    ticker: Option<Interval>,
    grace: Option<Pin<Box<Sleep>>>,
    on_complete: Option<CompletionCallback>,
}

impl SplashRunner {
    async fn run(mut self) {
        loop {
            let wake = tokio::select! {
                biased;
                changed = self.cancel_rx.changed() => match changed {
                    // Every sender gone means the host went away
                    Err(_) => Wake::Cancelled,
                    Ok(()) if *self.cancel_rx.borrow() => Wake::Cancelled,
                    Ok(()) => continue,
                },
                _ = next_tick(&mut self.ticker) => Wake::Tick,
                _ = grace_timer(&mut self.grace) => Wake::Grace,
            };

            // A callback may already be in flight when cancel is signalled
            if *self.cancel_rx.borrow() {
                self.finish_cancelled();
                break;
            }

            let phase = match wake {
                Wake::Tick => self.step(ProgressSimulator::tick),
                Wake::Grace => {
                    self.grace = None;
                    self.step(ProgressSimulator::grace_elapsed)
                }
                Wake::Cancelled => {
                    self.finish_cancelled();
                    break;
                }
            };

            if phase.is_terminal() {
                break;
            }
        }
        debug!("Splash runner stopped");
    }

    fn step<F>(&mut self, f: F) -> SplashPhase
    where
        F: FnOnce(&mut ProgressSimulator) -> Vec<SplashAction>,
    {
        let (actions, phase) = self.shared.transition(f);
        self.apply(actions);
        phase
    }

    fn finish_cancelled(&mut self) {
        let (actions, _) = self.shared.transition(ProgressSimulator::cancel);
        self.apply(actions);
        self.ticker = None;
        self.grace = None;
        info!("Splash runner cancelled");
    }

    /// Carry out simulator actions; must be called without the lock held
    fn apply(&mut self, actions: Vec<SplashAction>) {
        for action in actions {
            match action {
                SplashAction::StartTicker { interval } => {
                    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.ticker = Some(ticker);
                }
                SplashAction::StopTicker => self.ticker = None,
                SplashAction::ScheduleCompletion { delay } => {
                    self.grace = Some(Box::pin(tokio::time::sleep(delay)));
                }
                SplashAction::CancelCompletion => self.grace = None,
                SplashAction::Progressed(_) => {}
                SplashAction::Complete => {
                    if let Some(on_complete) = self.on_complete.take() {
                        on_complete();
                    }
                    self.shared.publish();
                }
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

async fn grace_timer(grace: &mut Option<Pin<Box<Sleep>>>) {
    match grace {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending::<()>().await,
    }
}
