//! Default status sink for the command-line front end.
//!
//! Renders every [`PollEvent`] as a line of text and keeps the [`LastKnown`]
//! snapshot on disk so `sigwatch status` can show the latest state of a run
//! in another process.

use crate::events::{EventReceiver, PollEvent};
use crate::state::{JsonFile, LastKnown};
use crate::time::{format_ms, now_ms};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Consumes poll events: prints them and persists the snapshot.
pub struct StatusSink {
    snapshot: JsonFile<LastKnown>,
    last: LastKnown,
    bell: bool,
}

impl StatusSink {
    pub fn new(snapshot_path: impl Into<PathBuf>, bell: bool) -> Self {
        let snapshot = JsonFile::new(snapshot_path);
        let last = snapshot.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable status snapshot: {}", e);
            LastKnown::default()
        });

        Self {
            snapshot,
            last,
            bell,
        }
    }

    /// The snapshot as currently held.
    pub fn last_known(&self) -> &LastKnown {
        &self.last
    }

    /// Apply one event to the snapshot, persisting it when it changed.
    pub fn apply(&mut self, event: &PollEvent) {
        match event {
            PollEvent::Started(run) => {
                self.last.active = Some(run.clone());
                self.last.last_response = None;
                self.last.updated_at_ms = now_ms();
            }
            PollEvent::Status(status) => {
                self.last.last_response = Some(status.summary());
                self.last.updated_at_ms = status.at_ms;
            }
            PollEvent::Alert(_) => return,
            PollEvent::Stopped => {
                self.last.active = None;
                self.last.updated_at_ms = now_ms();
            }
        }

        if let Err(e) = self.snapshot.save(&self.last) {
            warn!("Failed to persist status snapshot: {}", e);
        }
    }

    /// Drain the event stream until every sender is gone.
    pub async fn run(mut self, mut events: EventReceiver) {
        let mut stdout = std::io::stdout();
        while let Some(event) = events.recv().await {
            self.apply(&event);

            let bell = if self.bell && matches!(event, PollEvent::Alert(_)) {
                "\x07"
            } else {
                ""
            };
            if writeln!(stdout, "{}{}", bell, render(&event)).is_err() {
                debug!("stdout closed");
            }
        }
    }
}

/// Human-readable line for an event.
pub fn render(event: &PollEvent) -> String {
    match event {
        PollEvent::Started(run) => format!(
            "Polling {} as {} every {}s",
            run.endpoint, run.username, run.interval_secs
        ),
        PollEvent::Status(status) => {
            let time = format_ms(status.at_ms);
            match &status.error {
                Some(e) => format!("[{}] error: {}", time, e),
                None if status.changed => {
                    format!("[{}] {} (changed) <- {}", time, status.signal, status.raw_body)
                }
                None => format!("[{}] {} <- {}", time, status.signal, status.raw_body),
            }
        }
        PollEvent::Alert(alert) => format!("*** {}: {} ***", alert.title, alert.message),
        PollEvent::Stopped => "Polling stopped.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Alert, StatusEvent};
    use crate::signal::Signal;
    use crate::state::ActiveRun;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn run() -> ActiveRun {
        ActiveRun {
            endpoint: "http://localhost/latest".to_string(),
            username: "testuser".to_string(),
            interval_secs: 10,
        }
    }

    #[test]
    fn test_snapshot_follows_run_lifecycle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_known.json");
        let mut sink = StatusSink::new(&path, false);

        sink.apply(&PollEvent::Started(run()));
        sink.apply(&PollEvent::Status(StatusEvent::success(
            r#"{"data":1}"#.to_string(),
            Signal::Buy,
            true,
            1_000,
        )));

        let stored: LastKnown = JsonFile::new(&path).load().unwrap();
        assert_eq!(stored.active, Some(run()));
        assert_eq!(stored.last_response.as_deref(), Some(r#"{"data":1}"#));
        assert_eq!(stored.updated_at_ms, 1_000);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("last_signal"), "snapshot duplicates alert state: {}", raw);

        sink.apply(&PollEvent::Status(StatusEvent::failure("request timed out", 2_000)));
        sink.apply(&PollEvent::Stopped);

        let stored: LastKnown = JsonFile::new(&path).load().unwrap();
        assert_eq!(stored.active, None);
        assert_eq!(
            stored.last_response.as_deref(),
            Some("error: request timed out")
        );
    }

    #[test]
    fn test_sink_resumes_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_known.json");

        let mut first = StatusSink::new(&path, false);
        first.apply(&PollEvent::Started(run()));

        let second = StatusSink::new(&path, false);
        assert_eq!(second.last_known().active, Some(run()));
    }

    #[test]
    fn test_render_lines() {
        let alert = Alert::for_signal(Signal::Sell, 0).unwrap();
        assert_eq!(
            render(&PollEvent::Alert(alert)),
            "*** sell signal: new signal: -1 ***"
        );
        assert_eq!(
            render(&PollEvent::Started(run())),
            "Polling http://localhost/latest as testuser every 10s"
        );

        let line = render(&PollEvent::Status(StatusEvent::success(
            "-1".to_string(),
            Signal::Sell,
            true,
            0,
        )));
        assert_eq!(line, "[-] SELL (changed) <- -1");
    }

    #[tokio::test]
    async fn test_run_drains_until_closed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_known.json");
        let (tx, rx) = crate::events::channel();

        tx.send(PollEvent::Started(run())).unwrap();
        tx.send(PollEvent::Stopped).unwrap();
        drop(tx);

        StatusSink::new(&path, false).run(rx).await;

        let stored: LastKnown = JsonFile::new(&path).load().unwrap();
        assert_eq!(stored.active, None);
    }
}
