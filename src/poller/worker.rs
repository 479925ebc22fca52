//! The background task that runs ticks.

use super::engine::{PollPhase, PollStatus};
use super::PollConfig;
use crate::alert::AlertPolicy;
use crate::api::Fetcher;
use crate::events::{Alert, EventSender, PollEvent, StatusEvent};
use crate::signal;
use crate::state::ActiveRun;
use crate::time::now_ms;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub(super) struct Worker {
    pub(super) config: PollConfig,
    pub(super) fetcher: Arc<dyn Fetcher>,
    pub(super) policy: AlertPolicy,
    pub(super) events: EventSender,
    pub(super) status: Arc<watch::Sender<PollStatus>>,
    pub(super) stop: watch::Receiver<bool>,
}

impl Worker {
    pub(super) async fn run(mut self) {
        let interval = self.config.effective_interval();

        self.emit(PollEvent::Started(ActiveRun {
            endpoint: self.config.endpoint().to_string(),
            username: self.config.username().to_string(),
            interval_secs: self.config.interval_secs(),
        }));

        while !self.stop_requested() {
            let event = self.tick().await;
            self.status.send_modify(|status| {
                status.ticks += 1;
                status.last_event = Some(event.clone());
            });
            self.emit(PollEvent::Status(event));

            // A stop that arrived during the fetch skips the sleep.
            if self.stop_requested() {
                break;
            }

            tokio::select! {
                biased;
                _ = self.stop.changed() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        self.status.send_modify(|status| status.phase = PollPhase::Idle);
        self.emit(PollEvent::Stopped);
        info!("Poll loop stopped");
    }

    /// Fetch → extract → evaluate. Never fails; errors become the event.
    async fn tick(&self) -> StatusEvent {
        let body = match self.fetcher.fetch(&self.config).await {
            Ok(body) => body,
            Err(e) => {
                warn!(endpoint = %self.config.endpoint(), "Fetch failed: {}", e);
                return StatusEvent::failure(e, now_ms());
            }
        };

        let signal = signal::extract(&body);
        let now = now_ms();
        let decision = self.policy.observe(signal, now);

        debug!(%signal, changed = decision.changed, notify = decision.notify, "Tick");

        let alert = Alert::for_signal(signal, now).filter(|_| decision.notify);
        if let Some(alert) = alert {
            info!(title = %alert.title, "Signal alert");
            self.emit(PollEvent::Alert(alert));
        }

        StatusEvent::success(body, signal, decision.changed, now)
    }

    fn stop_requested(&self) -> bool {
        *self.stop.borrow()
    }

    fn emit(&self, event: PollEvent) {
        // A missing consumer must not stop the loop.
        if self.events.send(event).is_err() {
            debug!("No event consumer attached");
        }
    }
}
