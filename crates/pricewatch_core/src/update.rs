use crate::state::MAX_PRODUCTS_CEILING;
use crate::{AppState, Effect, Msg, ScrapeForm, ScrapeRequest};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started | Msg::RetryConnectivity => {
            state.begin_probe();
            vec![Effect::CheckHealth]
        }
        Msg::HealthReported { healthy } => {
            if state.set_connection(healthy) {
                // First successful probe: load the dashboard data.
                vec![Effect::RefreshProducts, Effect::RefreshAnalysis]
            } else {
                Vec::new()
            }
        }
        Msg::UrlsInputChanged(text) => {
            state.set_urls_input(text);
            Vec::new()
        }
        Msg::UrlAppended(url) => {
            state.append_url(url);
            Vec::new()
        }
        Msg::SiteToggled(site) => {
            state.toggle_site(site);
            Vec::new()
        }
        Msg::MaxProductsChanged(count) => {
            state.set_max_products(count);
            Vec::new()
        }
        Msg::OptionToggled(option) => {
            state.toggle_option(option);
            Vec::new()
        }
        Msg::ScrapeSubmitted => {
            if state.is_submitting() {
                return (state, Vec::new());
            }
            match build_request(state.form()) {
                Ok(request) => {
                    state.begin_submit();
                    vec![Effect::SubmitScrape { request }]
                }
                Err(reason) => {
                    state.note_validation_error(reason);
                    Vec::new()
                }
            }
        }
        Msg::DemoClicked => {
            if state.is_submitting() {
                return (state, Vec::new());
            }
            state.begin_submit();
            vec![Effect::StartDemo]
        }
        Msg::JobAccepted { job_id, message } => {
            state.install_job(job_id.clone(), message);
            vec![Effect::StartPolling { job_id }]
        }
        Msg::JobRejected { reason } => {
            state.submit_rejected(reason);
            Vec::new()
        }
        Msg::JobStatusReported(snapshot) => {
            if state.apply_job_report(snapshot) {
                // Terminal edge: release the poller and reload data, once.
                vec![
                    Effect::StopPolling,
                    Effect::RefreshProducts,
                    Effect::RefreshAnalysis,
                ]
            } else {
                Vec::new()
            }
        }
        Msg::JobPollFailed { job_id, reason } => {
            if state.poll_failed(&job_id, reason) {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::ProductsLoaded(products) => {
            state.set_products(products);
            Vec::new()
        }
        Msg::ProductsLoadFailed(reason) => {
            state.note_background_error(format!("Failed to load products: {reason}"));
            Vec::new()
        }
        Msg::AnalysisLoaded(summary) => {
            state.set_analysis(summary);
            Vec::new()
        }
        Msg::AnalysisLoadFailed(reason) => {
            state.note_background_error(format!("Failed to load analytics: {reason}"));
            Vec::new()
        }
        Msg::RefreshRequested => vec![Effect::RefreshProducts, Effect::RefreshAnalysis],
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Validates the form and builds the request, or reports why it is invalid.
/// Validation runs entirely before any network effect is emitted.
fn build_request(form: &ScrapeForm) -> Result<ScrapeRequest, String> {
    let urls = parse_urls(&form.urls_input);
    if urls.is_empty() {
        return Err("Please enter at least one URL".to_string());
    }
    for line in &urls {
        let parsed =
            url::Url::parse(line).map_err(|_| format!("Not a valid URL: {line}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("Not an http(s) URL: {line}"));
        }
    }
    if form.sites.is_empty() {
        return Err("Please select at least one target site".to_string());
    }
    debug_assert!(form.max_products >= 1 && form.max_products <= MAX_PRODUCTS_CEILING);

    Ok(ScrapeRequest {
        urls,
        target_sites: form.sites.iter().cloned().collect(),
        max_products: form.max_products,
        use_ai_parsing: form.use_ai_parsing,
        include_images: form.include_images,
        include_reviews: form.include_reviews,
    })
}

fn parse_urls(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
