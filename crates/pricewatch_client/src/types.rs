use serde::{Deserialize, Serialize};

use crate::{ApiError, CompetitiveAnalysis};

/// Job status as reported by the API. The backend has emitted both
/// `"started"` and `"pending"` for freshly created jobs; both decode to
/// [`JobStatus::Queued`]. Status strings this client does not know decode to
/// [`JobStatus::Unknown`] instead of failing the poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[serde(alias = "started", alias = "pending")]
    Queued,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Terminal statuses end the polling session.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One response from `GET /api/scrape/status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub products_scraped: Option<u64>,
}

/// A scraped product as served by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// The API names this field after the competitor site it was scraped
    /// from.
    #[serde(rename = "competitor")]
    pub source_site: String,
    pub url: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
    pub scraped_at: String,
    pub confidence_score: f64,
}

/// Body for `POST /api/scrape/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
    pub target_sites: Vec<String>,
    pub max_products: u32,
    pub use_ai_parsing: bool,
    pub include_images: bool,
    pub include_reviews: bool,
}

/// Acknowledgement for a start request (form or demo).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartedJob {
    pub job_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Events emitted by the background client loop and the status poller.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    HealthChecked { healthy: bool },
    JobAccepted(StartedJob),
    JobRejected(ApiError),
    JobStatus(JobSnapshot),
    JobPollFailed { job_id: String, error: ApiError },
    ProductsLoaded(Vec<Product>),
    ProductsFailed(ApiError),
    AnalysisLoaded(CompetitiveAnalysis),
    AnalysisFailed(ApiError),
}
