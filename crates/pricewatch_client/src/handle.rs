use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use client_logging::client_warn;

use crate::poll::{spawn_status_poll, ChannelEventSink, EventSink, PollHandle};
use crate::{ApiClient, ClientEvent, ClientSettings, ScrapeRequest};

enum ClientCommand {
    CheckHealth,
    StartScrape(ScrapeRequest),
    StartDemo,
    StartPolling { job_id: String },
    StopPolling,
    RefreshProducts,
    RefreshAnalysis,
}

/// Runs the API client on a background runtime thread. Commands go in over a
/// channel; results come back as [`ClientEvent`]s via `try_recv`.
///
/// The handle owns at most one polling session at a time: arming a new one
/// cancels the previous handle before the new poller starts.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    // `Receiver` is `Send` but not `Sync`; the handle is shared across threads
    // behind an `Arc` (command issuer + event pump), so wrap it to make the
    // handle `Sync`. Only the event-pump thread ever receives, so there is no
    // contention.
    event_rx: Mutex<mpsc::Receiver<ClientEvent>>,
}

impl ClientHandle {
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, crate::ApiError> {
        let client = ApiClient::new(base_url, &settings)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_loop(client, settings, cmd_rx, event_tx));

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn check_health(&self) {
        self.send(ClientCommand::CheckHealth);
    }

    pub fn start_scrape(&self, request: ScrapeRequest) {
        self.send(ClientCommand::StartScrape(request));
    }

    pub fn start_demo(&self) {
        self.send(ClientCommand::StartDemo);
    }

    pub fn start_polling(&self, job_id: impl Into<String>) {
        self.send(ClientCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        self.send(ClientCommand::StopPolling);
    }

    pub fn refresh_products(&self) {
        self.send(ClientCommand::RefreshProducts);
    }

    pub fn refresh_analysis(&self) {
        self.send(ClientCommand::RefreshAnalysis);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

fn run_loop(
    client: ApiClient,
    settings: ClientSettings,
    cmd_rx: mpsc::Receiver<ClientCommand>,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let client = Arc::new(client);
    let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx.clone()));
    // The single live polling session; replaced handles cancel on drop.
    let mut poller: Option<PollHandle> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            ClientCommand::StartPolling { job_id } => {
                if let Some(previous) = poller.take() {
                    previous.cancel();
                }
                let _guard = runtime.enter();
                poller = Some(spawn_status_poll(
                    client.clone(),
                    job_id,
                    settings.poll_interval,
                    sink.clone(),
                ));
            }
            ClientCommand::StopPolling => {
                if let Some(handle) = poller.take() {
                    handle.cancel();
                }
            }
            request => {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    if let Some(event) = run_request(&client, request).await {
                        let _ = event_tx.send(event);
                    }
                });
            }
        }
    }
}

async fn run_request(client: &ApiClient, command: ClientCommand) -> Option<ClientEvent> {
    let event = match command {
        ClientCommand::CheckHealth => match client.health().await {
            Ok(report) => ClientEvent::HealthChecked {
                healthy: report.is_healthy(),
            },
            Err(error) => {
                client_warn!("health probe failed: {}", error);
                ClientEvent::HealthChecked { healthy: false }
            }
        },
        ClientCommand::StartScrape(request) => match client.start_scrape(&request).await {
            Ok(started) => ClientEvent::JobAccepted(started),
            Err(error) => ClientEvent::JobRejected(error),
        },
        ClientCommand::StartDemo => match client.start_demo().await {
            Ok(started) => ClientEvent::JobAccepted(started),
            Err(error) => ClientEvent::JobRejected(error),
        },
        ClientCommand::RefreshProducts => match client.products().await {
            Ok(products) => ClientEvent::ProductsLoaded(products),
            Err(error) => ClientEvent::ProductsFailed(error),
        },
        ClientCommand::RefreshAnalysis => match client.competitive_analysis().await {
            Ok(analysis) => ClientEvent::AnalysisLoaded(analysis),
            Err(error) => ClientEvent::AnalysisFailed(error),
        },
        // Polling commands are handled synchronously by the command loop and
        // never reach this point.
        ClientCommand::StartPolling { .. } | ClientCommand::StopPolling => return None,
    };
    Some(event)
}
