/// Optional extraction features on the scrape form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOption {
    AiParsing,
    Images,
    Reviews,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// App shell finished wiring; probe the API.
    Started,
    /// User asked to re-probe connectivity after a failed health check.
    RetryConnectivity,
    /// Result of a health probe.
    HealthReported { healthy: bool },
    /// User replaced the URL input text (empty string clears it).
    UrlsInputChanged(String),
    /// User appended one URL line to the input.
    UrlAppended(String),
    /// User toggled a target site on or off.
    SiteToggled(String),
    /// User changed the per-site product bound.
    MaxProductsChanged(u32),
    /// User toggled an optional extraction feature.
    OptionToggled(ScrapeOption),
    /// User submitted the scrape form.
    ScrapeSubmitted,
    /// User started the one-shot live demo.
    DemoClicked,
    /// The API accepted a start request and assigned an identifier.
    JobAccepted { job_id: crate::JobId, message: String },
    /// The API rejected a start request.
    JobRejected { reason: String },
    /// One poll response for the tracked job.
    JobStatusReported(crate::JobSnapshot),
    /// A poll failed at the transport level; the session is over.
    JobPollFailed { job_id: crate::JobId, reason: String },
    /// Product list fetched.
    ProductsLoaded(Vec<crate::ProductRecord>),
    ProductsLoadFailed(String),
    /// Competitive analysis fetched.
    AnalysisLoaded(crate::AnalysisSummary),
    AnalysisLoadFailed(String),
    /// User asked to reload products and analysis.
    RefreshRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
