use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::analysis::AnalysisEnvelope;
use crate::error::map_reqwest_error;
use crate::{
    ApiError, ApiErrorKind, CompetitiveAnalysis, HealthReport, JobSnapshot, Product,
    ScrapeRequest, StartedJob,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between successive status polls for one job.
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// Status fetches behind a seam so the poller can run against fakes.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &str) -> Result<JobSnapshot, ApiError>;
}

/// Typed client for the scraping API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: url::Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, settings: &ClientSettings) -> Result<Self, ApiError> {
        let base = url::Url::parse(base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidBaseUrl, err.to_string()))?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { base, http })
    }

    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get_json("/health").await
    }

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/api/products").await
    }

    pub async fn competitive_analysis(&self) -> Result<CompetitiveAnalysis, ApiError> {
        let envelope: AnalysisEnvelope = self.get_json("/api/analysis/competitive").await?;
        CompetitiveAnalysis::from_envelope(envelope)
    }

    pub async fn start_scrape(&self, request: &ScrapeRequest) -> Result<StartedJob, ApiError> {
        self.post_json("/api/scrape/start", request).await
    }

    pub async fn start_demo(&self) -> Result<StartedJob, ApiError> {
        self.get_json("/api/demo/start").await
    }

    pub async fn job_status(&self, job_id: &str) -> Result<JobSnapshot, ApiError> {
        self.get_json(&format!("/api/scrape/status/{job_id}")).await
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidBaseUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_response(response).await
    }
}

#[async_trait::async_trait]
impl StatusSource for ApiClient {
    async fn fetch_status(&self, job_id: &str) -> Result<JobSnapshot, ApiError> {
        self.job_status(job_id).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::with_detail(
            ApiErrorKind::HttpStatus(status.as_u16()),
            status.to_string(),
            extract_detail(&body),
        ));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))
}

/// Pulls the `detail` member out of an error body, the shape the API uses for
/// its error responses. Non-JSON bodies yield no detail.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
