use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::HomeworkSource;
use crate::error::PollError;
use crate::response::{check_response, current_date};
use crate::status::parse_status;
use crate::telegram::Notifier;

/// Lower bound of the next API query. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn new(timestamp: i64) -> Self {
        Self(timestamp)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Moves the cursor to `timestamp` unless that would move it backwards.
    pub fn advance(&mut self, timestamp: i64) -> bool {
        if timestamp > self.0 {
            self.0 = timestamp;
            true
        } else {
            false
        }
    }
}

/// What a single cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The API returned no homeworks.
    NoUpdates,
    /// A status message was delivered.
    Notified(String),
    /// The newest status equals the last delivered message.
    Unchanged,
    /// The cycle failed; `reported` tells whether the diagnostic message went out.
    Failed { error: PollError, reported: bool },
}

pub struct HomeworkPoller<S, N> {
    source: S,
    notifier: N,
    cursor: PollCursor,
    last_message: Option<String>,
}

impl<S, N> HomeworkPoller<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, cursor: PollCursor) -> Self {
        Self {
            source,
            notifier,
            cursor,
            last_message: None,
        }
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Runs one fetch, validate, format and notify pass. Never fails: errors are
    /// logged, reported to the chat when the text is new, and returned in the outcome.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.check_updates().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    kind = err.kind(),
                    error = %err,
                    cursor = self.cursor.value(),
                    "polling cycle failed"
                );
                let message = format!("Сбой в работе программы: {err}");
                let reported = self.report(message).await;
                CycleOutcome::Failed {
                    error: err,
                    reported,
                }
            }
        }
    }

    async fn check_updates(&mut self) -> Result<CycleOutcome, PollError> {
        let response = self.source.fetch(self.cursor.value()).await?;
        let homeworks = check_response(&response)?;

        let outcome = match homeworks.first() {
            None => {
                debug!(cursor = self.cursor.value(), "no homework updates");
                CycleOutcome::NoUpdates
            }
            Some(homework) => {
                let message = parse_status(homework)?;
                if self.last_message.as_deref() == Some(message.as_str()) {
                    debug!("homework status unchanged");
                    CycleOutcome::Unchanged
                } else {
                    self.notifier.send_message(&message).await?;
                    info!(message = %message, "homework status change delivered");
                    self.last_message = Some(message.clone());
                    CycleOutcome::Notified(message)
                }
            }
        };

        if let Some(date) = current_date(&response) {
            if self.cursor.advance(date) {
                info!(cursor = date, "cursor advanced");
            }
        }
        Ok(outcome)
    }

    /// Best-effort delivery of a diagnostic message, subject to the same
    /// duplicate suppression as status messages.
    async fn report(&mut self, message: String) -> bool {
        if self.last_message.as_deref() == Some(message.as_str()) {
            warn!("diagnostic message already sent, suppressed");
            return false;
        }
        match self.notifier.send_message(&message).await {
            Ok(()) => {
                self.last_message = Some(message);
                true
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "failed to deliver diagnostic message");
                false
            }
        }
    }
}

pub struct PollerHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl PollerHandle {
    pub async fn stop(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.cancel_tx.send(());
        self.join.await
    }
}

/// Runs the poller on a background task: one cycle, then `retry_period` of
/// sleep, forever. Cycle failures never end the task; only `stop` does.
pub fn spawn_poller<S, N>(mut poller: HomeworkPoller<S, N>, retry_period: Duration) -> PollerHandle
where
    S: HomeworkSource + 'static,
    N: Notifier + 'static,
{
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        info!(cursor = poller.cursor().value(), "poller started");
        loop {
            poller.poll_once().await;
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("poller shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(retry_period) => {}
            }
        }
    });

    PollerHandle { cancel_tx, join }
}
