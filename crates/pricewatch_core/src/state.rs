use std::collections::BTreeSet;

use crate::msg::ScrapeOption;
use crate::view_model::{self, DashboardViewModel, FormView};

/// Identifier assigned to a job by the external API. Opaque to this crate.
pub type JobId = String;

/// Connectivity to the external API, as last observed by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// A health probe is in flight (also the initial state).
    #[default]
    Probing,
    Connected,
    Disconnected,
}

/// Lifecycle phase of a server-tracked scraping job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Queued,
    Running,
    Completed,
    Failed,
    /// The server reported a status string this client does not know.
    Unknown,
}

impl JobPhase {
    /// Terminal phases admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }
}

/// The single job this controller instance is tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub phase: JobPhase,
    pub message: String,
    pub progress: Option<f64>,
    pub products_scraped: Option<u64>,
}

/// One status report for a job, as mapped from a poll response.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub phase: JobPhase,
    pub message: String,
    pub progress: Option<f64>,
    pub products_scraped: Option<u64>,
}

/// A scraped product as served by the API. Read-only on this side.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub source_site: String,
    pub url: String,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub scraped_at: String,
    pub confidence_score: f64,
}

/// Per-site slice of the competitive analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteComparison {
    pub site: String,
    pub avg_price: Option<f64>,
    pub product_count: Option<u64>,
}

/// Digested competitive analysis. Fields absent from the server payload stay
/// `None` rather than failing the load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisSummary {
    pub total_products: Option<u64>,
    pub average_price: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub per_site: Vec<SiteComparison>,
    pub insights: Vec<String>,
}

/// Inline notice shown next to the scrape form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    Info(String),
    Error(String),
}

/// Editable scrape-form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeForm {
    pub urls_input: String,
    pub sites: BTreeSet<String>,
    pub max_products: u32,
    pub use_ai_parsing: bool,
    pub include_images: bool,
    pub include_reviews: bool,
}

pub(crate) const MAX_PRODUCTS_CEILING: u32 = 1000;

impl Default for ScrapeForm {
    fn default() -> Self {
        Self {
            urls_input: String::new(),
            sites: ["amazon", "bestbuy", "walmart"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            max_products: 50,
            use_ai_parsing: true,
            include_images: true,
            include_reviews: false,
        }
    }
}

/// Validated payload for a start-job request, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
    pub target_sites: Vec<String>,
    pub max_products: u32,
    pub use_ai_parsing: bool,
    pub include_images: bool,
    pub include_reviews: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    connection: ConnectionState,
    form: ScrapeForm,
    form_notice: Option<FormNotice>,
    submitting: bool,
    job: Option<JobRecord>,
    poll_active: bool,
    products: Vec<ProductRecord>,
    analysis: Option<AnalysisSummary>,
    status_line: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardViewModel {
        DashboardViewModel {
            connection: self.connection,
            job: self.job.as_ref().map(view_model::job_card),
            product_table: view_model::project_products(&self.products),
            product_count: self.products.len(),
            analysis: self.analysis.as_ref().map(view_model::project_analysis),
            form: FormView {
                urls_input: self.form.urls_input.clone(),
                sites: self.form.sites.iter().cloned().collect(),
                max_products: self.form.max_products,
                use_ai_parsing: self.form.use_ai_parsing,
                include_images: self.form.include_images,
                include_reviews: self.form.include_reviews,
                notice: self.form_notice.clone(),
                submitting: self.submitting,
            },
            busy: self.submitting || self.poll_active,
            status_line: self.status_line.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it. The shell renders on `true`.
    pub fn consume_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn form(&self) -> &ScrapeForm {
        &self.form
    }

    pub fn job(&self) -> Option<&JobRecord> {
        self.job.as_ref()
    }

    pub fn poll_active(&self) -> bool {
        self.poll_active
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_probe(&mut self) {
        self.connection = ConnectionState::Probing;
        self.mark_dirty();
    }

    /// Records the probe result. Returns true when this report transitions
    /// the state into `Connected`, which triggers the initial data load.
    pub(crate) fn set_connection(&mut self, healthy: bool) -> bool {
        let was_connected = self.connection == ConnectionState::Connected;
        self.connection = if healthy {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        self.mark_dirty();
        healthy && !was_connected
    }

    pub(crate) fn set_urls_input(&mut self, text: String) {
        self.form.urls_input = text;
        self.mark_dirty();
    }

    pub(crate) fn append_url(&mut self, url: String) {
        if !self.form.urls_input.is_empty() && !self.form.urls_input.ends_with('\n') {
            self.form.urls_input.push('\n');
        }
        self.form.urls_input.push_str(&url);
        self.mark_dirty();
    }

    pub(crate) fn toggle_site(&mut self, site: String) {
        let site = site.to_ascii_lowercase();
        if !self.form.sites.remove(&site) {
            self.form.sites.insert(site);
        }
        self.mark_dirty();
    }

    pub(crate) fn set_max_products(&mut self, count: u32) {
        self.form.max_products = count.clamp(1, MAX_PRODUCTS_CEILING);
        self.mark_dirty();
    }

    pub(crate) fn toggle_option(&mut self, option: ScrapeOption) {
        let flag = match option {
            ScrapeOption::AiParsing => &mut self.form.use_ai_parsing,
            ScrapeOption::Images => &mut self.form.include_images,
            ScrapeOption::Reviews => &mut self.form.include_reviews,
        };
        *flag = !*flag;
        self.mark_dirty();
    }

    pub(crate) fn note_validation_error(&mut self, text: String) {
        self.form_notice = Some(FormNotice::Error(text));
        self.mark_dirty();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
        self.form_notice = None;
        self.mark_dirty();
    }

    pub(crate) fn submit_rejected(&mut self, reason: String) {
        self.submitting = false;
        self.form_notice = Some(FormNotice::Error(format!("Error: {reason}")));
        self.mark_dirty();
    }

    /// Installs a freshly accepted job in `Queued`. Replaces any prior job
    /// record; the caller re-arms polling for the new identifier.
    pub(crate) fn install_job(&mut self, job_id: JobId, message: String) {
        self.submitting = false;
        self.form_notice = Some(FormNotice::Info(format!(
            "Scraping job started! Job ID: {job_id}"
        )));
        self.job = Some(JobRecord {
            id: job_id,
            phase: JobPhase::Queued,
            message,
            progress: None,
            products_scraped: None,
        });
        self.poll_active = true;
        self.mark_dirty();
    }

    /// Applies one poll report. Returns true exactly when this report moves
    /// the actively polled job into a terminal phase; the caller emits the
    /// refresh effects on that edge and never again.
    ///
    /// Reports for a job other than the current one (a stale poller after a
    /// fresh start) and reports against an already terminal record are
    /// dropped.
    pub(crate) fn apply_job_report(&mut self, snapshot: JobSnapshot) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if job.id != snapshot.job_id || job.phase.is_terminal() {
            return false;
        }

        job.phase = snapshot.phase;
        job.message = snapshot.message;
        job.progress = merge_monotonic(job.progress, snapshot.progress);
        job.products_scraped = merge_monotonic(job.products_scraped, snapshot.products_scraped);
        self.mark_dirty();

        if snapshot.phase.is_terminal() && self.poll_active {
            self.poll_active = false;
            return true;
        }
        false
    }

    /// Marks the polling session failed after a transport error. Returns true
    /// when the failure applied to the current, still-live job.
    pub(crate) fn poll_failed(&mut self, job_id: &str, reason: String) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if job.id != job_id || job.phase.is_terminal() {
            return false;
        }
        job.phase = JobPhase::Failed;
        job.message = reason;
        self.poll_active = false;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_products(&mut self, products: Vec<ProductRecord>) {
        self.products = products;
        self.mark_dirty();
    }

    pub(crate) fn set_analysis(&mut self, analysis: AnalysisSummary) {
        self.analysis = Some(analysis);
        self.mark_dirty();
    }

    pub(crate) fn note_background_error(&mut self, text: String) {
        self.status_line = Some(text);
        self.mark_dirty();
    }
}

/// Keeps a reported counter from moving backwards between polls. The server
/// stays the source of truth for status; this only smooths the display.
fn merge_monotonic<T: PartialOrd>(previous: Option<T>, observed: Option<T>) -> Option<T> {
    match (previous, observed) {
        (Some(prev), Some(next)) => Some(if next < prev { prev } else { next }),
        (prev, None) => prev,
        (None, next) => next,
    }
}
