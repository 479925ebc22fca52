//! Poller handle - manages the worker lifecycle.

use super::PollConfig;
use super::worker::Worker;
use crate::alert::AlertPolicy;
use crate::api::Fetcher;
use crate::error::{Error, Result};
use crate::events::{self, EventReceiver, EventSender, StatusEvent};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Lifecycle phase of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    /// No worker is running.
    #[default]
    Idle,
    /// Ticking.
    Running,
    /// Stop requested; the in-flight tick is finishing.
    Stopping,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "⏹ Idle"),
            Self::Running => write!(f, "▶ Running"),
            Self::Stopping => write!(f, "⏸ Stopping"),
        }
    }
}

/// Observable status of the poll loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStatus {
    pub phase: PollPhase,
    /// Ticks completed in the current (or last) run.
    pub ticks: u64,
    /// Most recent tick outcome.
    pub last_event: Option<StatusEvent>,
}

/// A running worker.
struct RunHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Start/stop handle around the poll worker.
pub struct Poller {
    fetcher: Arc<dyn Fetcher>,
    policy: AlertPolicy,
    event_tx: EventSender,
    status_tx: Arc<watch::Sender<PollStatus>>,
    run: Option<RunHandle>,
}

impl Poller {
    /// Create an idle poller and the receiving end of its event stream.
    pub fn new(fetcher: Arc<dyn Fetcher>, policy: AlertPolicy) -> (Self, EventReceiver) {
        let (event_tx, event_rx) = events::channel();
        let (status_tx, _) = watch::channel(PollStatus::default());

        let poller = Self {
            fetcher,
            policy,
            event_tx,
            status_tx: Arc::new(status_tx),
            run: None,
        };

        (poller, event_rx)
    }

    /// Start polling with `config`. Persisted alert state is kept as is.
    pub fn start(&mut self, config: PollConfig) -> Result<()> {
        if self.is_active() {
            return Err(Error::AlreadyRunning);
        }

        info!(
            endpoint = %config.endpoint(),
            interval_secs = config.effective_interval().as_secs(),
            "Starting poll loop"
        );

        self.status_tx.send_modify(|status| {
            status.phase = PollPhase::Running;
            status.ticks = 0;
        });

        let (stop_tx, stop_rx) = watch::channel(false);
        let worker = Worker {
            config,
            fetcher: Arc::clone(&self.fetcher),
            policy: self.policy.clone(),
            events: self.event_tx.clone(),
            status: Arc::clone(&self.status_tx),
            stop: stop_rx,
        };

        let join = tokio::spawn(worker.run());
        self.run = Some(RunHandle { stop_tx, join });

        Ok(())
    }

    /// Request a stop and wait for the worker to exit.
    ///
    /// A fetch already in flight is allowed to complete; no further tick starts.
    pub async fn stop(&mut self) -> Result<()> {
        let run = self.run.take().ok_or(Error::NotRunning)?;

        info!("Stopping poll loop");
        self.status_tx.send_modify(|status| {
            if status.phase == PollPhase::Running {
                status.phase = PollPhase::Stopping;
            }
        });

        // The worker may already have exited, in which case nobody listens.
        let _ = run.stop_tx.send(true);

        run.join
            .await
            .map_err(|e| Error::channel(format!("poll worker failed: {}", e)))
    }

    /// Whether a worker is currently running.
    pub fn is_active(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| !run.join.is_finished())
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> PollPhase {
        self.status_tx.borrow().phase
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> PollStatus {
        self.status_tx.borrow().clone()
    }

    /// Watch status changes.
    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.status_tx.subscribe()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            let _ = run.stop_tx.send(true);
        }
    }
}
