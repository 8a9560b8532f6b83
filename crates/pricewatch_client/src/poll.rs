use std::sync::Arc;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use tokio_util::sync::CancellationToken;

use crate::{ClientEvent, StatusSource};

/// Receives client events from background tasks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

/// Forwards events over a channel to the consumer thread.
pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Owned handle to one polling session. Dropping the handle cancels the
/// session, so a replaced poller can never keep ticking unobserved.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawns the status poll loop for one job onto the current runtime.
///
/// The first fetch happens one full interval after the call. The loop ends on
/// the first terminal status, on the first transport failure (no retry), or
/// when the handle is cancelled; it never schedules a fetch after any of
/// those.
pub fn spawn_status_poll(
    source: Arc<dyn StatusSource>,
    job_id: String,
    interval: Duration,
    sink: Arc<dyn EventSink>,
) -> PollHandle {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick resolves immediately; consume it so polling starts
        // one interval after the job was accepted.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    client_debug!("poll for job {} cancelled", job_id);
                    break;
                }
                _ = ticker.tick() => {
                    match source.fetch_status(&job_id).await {
                        Ok(snapshot) => {
                            client_debug!(
                                "poll job_id={} status={:?} progress={:?}",
                                job_id,
                                snapshot.status,
                                snapshot.progress
                            );
                            let terminal = snapshot.status.is_terminal();
                            sink.emit(ClientEvent::JobStatus(snapshot));
                            if terminal {
                                client_info!("job {} reached a terminal status", job_id);
                                break;
                            }
                        }
                        Err(error) => {
                            client_warn!("poll for job {} failed: {}", job_id, error);
                            sink.emit(ClientEvent::JobPollFailed {
                                job_id: job_id.clone(),
                                error,
                            });
                            break;
                        }
                    }
                }
            }
        }
    });

    PollHandle { token }
}
