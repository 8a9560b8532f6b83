use std::sync::Once;

use pricewatch_core::{
    update, AppState, Effect, JobPhase, JobSnapshot, Msg, ProductRecord, ProductTableView,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn accepted_job(job_id: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, _) = update(state, Msg::HealthReported { healthy: true });
    let (state, _) = update(state, Msg::DemoClicked);
    update(
        state,
        Msg::JobAccepted {
            job_id: job_id.to_string(),
            message: "Demo scraping started".to_string(),
        },
    )
}

fn report(job_id: &str, phase: JobPhase, progress: Option<f64>) -> Msg {
    Msg::JobStatusReported(JobSnapshot {
        job_id: job_id.to_string(),
        phase,
        message: format!("Job {}", pricewatch_core::status_label(phase).to_lowercase()),
        progress,
        products_scraped: None,
    })
}

fn product(id: i64, site: &str) -> ProductRecord {
    ProductRecord {
        id,
        name: format!("Product {id}"),
        price: 199.99,
        source_site: site.to_string(),
        url: format!("https://{site}.example.com/p/{id}"),
        rating: Some(4.5),
        review_count: Some(120),
        scraped_at: "2026-08-07T12:00:00Z".to_string(),
        confidence_score: 0.95,
    }
}

#[test]
fn accepted_job_is_queued_and_arms_polling() {
    init_logging();
    let (mut state, effects) = accepted_job("job-1");

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "job-1".to_string()
        }]
    );
    let view = state.view();
    let job = view.job.expect("job card present");
    assert_eq!(job.job_id, "job-1");
    assert_eq!(job.status_label, "Queued");
    assert!(view.busy);
    assert!(state.consume_dirty());
}

#[test]
fn non_terminal_reports_advance_the_job_without_effects() {
    init_logging();
    let (state, _) = accepted_job("job-1");

    let (state, effects) = update(state, report("job-1", JobPhase::Running, Some(0.42)));
    assert!(effects.is_empty());

    let job = state.view().job.expect("job card present");
    assert_eq!(job.status_label, "Running");
    assert_eq!(job.progress_text.as_deref(), Some("42%"));
    assert!(state.view().busy);
}

#[test]
fn first_terminal_report_stops_polling_and_refreshes_exactly_once() {
    init_logging();
    let (state, _) = accepted_job("job-1");
    let (state, _) = update(state, report("job-1", JobPhase::Running, Some(0.5)));

    let (state, effects) = update(state, report("job-1", JobPhase::Completed, Some(1.0)));
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling,
            Effect::RefreshProducts,
            Effect::RefreshAnalysis,
        ]
    );
    assert!(!state.view().busy);

    // A duplicate terminal report must neither mutate the record nor refresh
    // again.
    let before = state.clone();
    let (state, effects) = update(state, report("job-1", JobPhase::Failed, None));
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn progress_and_product_counts_never_regress() {
    init_logging();
    let (state, _) = accepted_job("job-1");

    let (state, _) = update(
        state,
        Msg::JobStatusReported(JobSnapshot {
            job_id: "job-1".to_string(),
            phase: JobPhase::Running,
            message: "Scraping in progress".to_string(),
            progress: Some(0.6),
            products_scraped: Some(12),
        }),
    );
    let (state, _) = update(
        state,
        Msg::JobStatusReported(JobSnapshot {
            job_id: "job-1".to_string(),
            phase: JobPhase::Running,
            message: "Scraping in progress".to_string(),
            progress: Some(0.4),
            products_scraped: Some(7),
        }),
    );

    let job = state.view().job.expect("job card present");
    assert_eq!(job.progress_text.as_deref(), Some("60%"));
    assert_eq!(job.products_scraped, Some(12));
}

#[test]
fn reports_for_a_stale_job_are_dropped() {
    init_logging();
    let (state, _) = accepted_job("job-2");

    let before = state.clone();
    let (state, effects) = update(state, report("job-1", JobPhase::Completed, None));

    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn poll_transport_failure_ends_the_session_without_refresh() {
    init_logging();
    let (state, _) = accepted_job("job-1");
    let (state, _) = update(state, report("job-1", JobPhase::Running, None));

    let (state, effects) = update(
        state,
        Msg::JobPollFailed {
            job_id: "job-1".to_string(),
            reason: "connection reset by peer".to_string(),
        },
    );

    assert_eq!(effects, vec![Effect::StopPolling]);
    let view = state.view();
    let job = view.job.expect("job card present");
    assert_eq!(job.status_label, "Failed");
    assert_eq!(job.message, "connection reset by peer");
    assert!(!view.busy);
}

#[test]
fn poll_failure_for_a_finished_job_is_ignored() {
    init_logging();
    let (state, _) = accepted_job("job-1");
    let (state, _) = update(state, report("job-1", JobPhase::Completed, None));

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::JobPollFailed {
            job_id: "job-1".to_string(),
            reason: "timeout".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn fresh_start_replaces_a_terminal_job() {
    init_logging();
    let (state, _) = accepted_job("job-1");
    let (state, _) = update(state, report("job-1", JobPhase::Completed, None));

    let (state, effects) = update(
        state,
        Msg::JobAccepted {
            job_id: "job-2".to_string(),
            message: "Scraping job started successfully".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "job-2".to_string()
        }]
    );
    let job = state.view().job.expect("job card present");
    assert_eq!(job.job_id, "job-2");
    assert_eq!(job.status_label, "Queued");

    // The replaced job's reports no longer apply.
    let (state, effects) = update(state, report("job-1", JobPhase::Failed, None));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().job.expect("job card present").status_label,
        "Queued"
    );
}

#[test]
fn products_loaded_fills_the_table() {
    init_logging();
    let (state, _) = accepted_job("job-1");
    let (state, _) = update(
        state,
        Msg::ProductsLoaded(vec![product(1, "amazon"), product(2, "walmart")]),
    );

    let view = state.view();
    assert_eq!(view.product_count, 2);
    let ProductTableView::Rows(rows) = view.product_table else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 2);

    // An empty reload falls back to the no-data state.
    let (state, _) = update(state, Msg::ProductsLoaded(Vec::new()));
    assert_eq!(state.view().product_table, ProductTableView::Empty);
    assert_eq!(state.view().product_count, 0);
}

#[test]
fn background_load_failures_surface_a_status_line() {
    init_logging();
    let (state, _) = accepted_job("job-1");
    let (state, effects) = update(
        state,
        Msg::ProductsLoadFailed("503 Service Unavailable".to_string()),
    );

    assert!(effects.is_empty());
    let status = state.view().status_line.expect("status line present");
    assert!(status.contains("products"));
    assert!(status.contains("503"));
}

#[test]
fn refresh_request_reloads_products_and_analysis() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::RefreshRequested);
    assert_eq!(
        effects,
        vec![Effect::RefreshProducts, Effect::RefreshAnalysis]
    );
}
