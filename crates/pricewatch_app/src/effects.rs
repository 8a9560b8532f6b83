use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use pricewatch_client::{ApiError, ClientEvent, ClientHandle, CompetitiveAnalysis};
use pricewatch_core::{
    AnalysisSummary, Effect, JobPhase, JobSnapshot, Msg, ProductRecord, SiteComparison,
};

use crate::config::AppConfig;
use crate::input::Command;

/// Executes core effects against the API client and pumps client events back
/// into the main loop as messages.
pub struct EffectRunner {
    handle: Arc<ClientHandle>,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, tx: mpsc::Sender<Command>) -> Result<Self, ApiError> {
        let handle = Arc::new(ClientHandle::new(
            &config.api_base_url,
            config.client_settings(),
        )?);
        let runner = Self { handle };
        runner.spawn_event_pump(tx);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckHealth => self.handle.check_health(),
                Effect::SubmitScrape { request } => {
                    client_info!(
                        "SubmitScrape urls={} sites={:?} max_products={}",
                        request.urls.len(),
                        request.target_sites,
                        request.max_products
                    );
                    self.handle.start_scrape(pricewatch_client::ScrapeRequest {
                        urls: request.urls,
                        target_sites: request.target_sites,
                        max_products: request.max_products,
                        use_ai_parsing: request.use_ai_parsing,
                        include_images: request.include_images,
                        include_reviews: request.include_reviews,
                    });
                }
                Effect::StartDemo => self.handle.start_demo(),
                Effect::StartPolling { job_id } => {
                    client_info!("StartPolling job_id={}", job_id);
                    self.handle.start_polling(job_id);
                }
                Effect::StopPolling => self.handle.stop_polling(),
                Effect::RefreshProducts => self.handle.refresh_products(),
                Effect::RefreshAnalysis => self.handle.refresh_analysis(),
            }
        }
    }

    fn spawn_event_pump(&self, tx: mpsc::Sender<Command>) {
        let handle = self.handle.clone();
        thread::spawn(move || loop {
            if let Some(event) = handle.try_recv() {
                if tx.send(Command::Dispatch(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::HealthChecked { healthy } => Msg::HealthReported { healthy },
        ClientEvent::JobAccepted(started) => Msg::JobAccepted {
            job_id: started.job_id,
            message: started
                .message
                .unwrap_or_else(|| "Scraping job started".to_string()),
        },
        ClientEvent::JobRejected(error) => Msg::JobRejected {
            reason: error.surface_message().to_string(),
        },
        ClientEvent::JobStatus(snapshot) => Msg::JobStatusReported(map_snapshot(snapshot)),
        ClientEvent::JobPollFailed { job_id, error } => {
            client_warn!("Poll for job {} failed: {}", job_id, error);
            Msg::JobPollFailed {
                job_id,
                reason: error.surface_message().to_string(),
            }
        }
        ClientEvent::ProductsLoaded(products) => {
            Msg::ProductsLoaded(products.into_iter().map(map_product).collect())
        }
        ClientEvent::ProductsFailed(error) => {
            Msg::ProductsLoadFailed(error.surface_message().to_string())
        }
        ClientEvent::AnalysisLoaded(analysis) => Msg::AnalysisLoaded(map_analysis(&analysis)),
        ClientEvent::AnalysisFailed(error) => {
            Msg::AnalysisLoadFailed(error.surface_message().to_string())
        }
    }
}

fn map_phase(status: pricewatch_client::JobStatus) -> JobPhase {
    match status {
        pricewatch_client::JobStatus::Queued => JobPhase::Queued,
        pricewatch_client::JobStatus::Running => JobPhase::Running,
        pricewatch_client::JobStatus::Completed => JobPhase::Completed,
        pricewatch_client::JobStatus::Failed => JobPhase::Failed,
        pricewatch_client::JobStatus::Unknown => JobPhase::Unknown,
    }
}

fn map_snapshot(snapshot: pricewatch_client::JobSnapshot) -> JobSnapshot {
    JobSnapshot {
        job_id: snapshot.job_id,
        phase: map_phase(snapshot.status),
        message: snapshot.message,
        progress: snapshot.progress,
        products_scraped: snapshot.products_scraped,
    }
}

fn map_product(product: pricewatch_client::Product) -> ProductRecord {
    ProductRecord {
        id: product.id,
        name: product.name,
        price: product.price,
        source_site: product.source_site,
        url: product.url,
        rating: product.rating,
        review_count: product.review_count,
        scraped_at: product.scraped_at,
        confidence_score: product.confidence_score,
    }
}

fn map_analysis(analysis: &CompetitiveAnalysis) -> AnalysisSummary {
    let (price_min, price_max) = match analysis.price_range() {
        Some((min, max)) => (Some(min), Some(max)),
        None => (None, None),
    };
    AnalysisSummary {
        total_products: analysis.total_products(),
        average_price: analysis.average_price(),
        price_min,
        price_max,
        per_site: analysis
            .site_comparison()
            .into_iter()
            .map(|stats| SiteComparison {
                site: stats.site,
                avg_price: stats.avg_price,
                product_count: stats.product_count,
            })
            .collect(),
        insights: analysis.market_insights(),
    }
}
