use std::sync::Once;

use pricewatch_core::{
    update, AppState, ConnectionState, Effect, FormNotice, Msg, ScrapeOption,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn connected_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, _) = update(state, Msg::HealthReported { healthy: true });
    state
}

fn submit(state: AppState, urls: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::UrlsInputChanged(urls.to_string()));
    update(state, Msg::ScrapeSubmitted)
}

fn form_error(state: &AppState) -> String {
    match state.view().form.notice {
        Some(FormNotice::Error(text)) => text,
        other => panic!("expected a form error, got {other:?}"),
    }
}

#[test]
fn startup_probes_health() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);

    assert_eq!(effects, vec![Effect::CheckHealth]);
    assert_eq!(state.view().connection, ConnectionState::Probing);
}

#[test]
fn first_successful_probe_loads_dashboard_data() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, effects) = update(state, Msg::HealthReported { healthy: true });

    assert_eq!(state.view().connection, ConnectionState::Connected);
    assert_eq!(
        effects,
        vec![Effect::RefreshProducts, Effect::RefreshAnalysis]
    );

    // A repeated healthy report must not reload anything.
    let (state, effects) = update(state, Msg::HealthReported { healthy: true });
    assert_eq!(state.view().connection, ConnectionState::Connected);
    assert!(effects.is_empty());
}

#[test]
fn failed_probe_shows_disconnected_banner_with_retry() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Started);
    let (mut state, effects) = update(state, Msg::HealthReported { healthy: false });

    assert_eq!(state.view().connection, ConnectionState::Disconnected);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());

    let (state, effects) = update(state, Msg::RetryConnectivity);
    assert_eq!(state.view().connection, ConnectionState::Probing);
    assert_eq!(effects, vec![Effect::CheckHealth]);
}

#[test]
fn submit_without_urls_is_rejected_before_any_network_call() {
    init_logging();
    let (state, effects) = update(connected_state(), Msg::ScrapeSubmitted);

    assert!(effects.is_empty());
    assert!(form_error(&state).contains("URL"));
    assert!(!state.view().form.submitting);
}

#[test]
fn submit_with_blank_lines_only_is_rejected() {
    init_logging();
    let (state, effects) = submit(connected_state(), "   \n\n  \n");

    assert!(effects.is_empty());
    assert!(form_error(&state).contains("URL"));
}

#[test]
fn submit_with_malformed_url_names_the_line() {
    init_logging();
    let (state, effects) = submit(connected_state(), "https://a.example.com\nnot a url\n");

    assert!(effects.is_empty());
    assert!(form_error(&state).contains("not a url"));
}

#[test]
fn submit_with_non_http_scheme_is_rejected() {
    init_logging();
    let (state, effects) = submit(connected_state(), "ftp://files.example.com/feed\n");

    assert!(effects.is_empty());
    assert!(form_error(&state).contains("http(s)"));
}

#[test]
fn submit_with_no_sites_selected_is_rejected() {
    init_logging();
    let mut state = connected_state();
    for site in ["amazon", "bestbuy", "walmart"] {
        let (next, _) = update(state, Msg::SiteToggled(site.to_string()));
        state = next;
    }
    assert!(state.view().form.sites.is_empty());

    let (state, effects) = submit(state, "https://www.amazon.com/s?k=iphone\n");
    assert!(effects.is_empty());
    assert!(form_error(&state).contains("site"));
}

#[test]
fn valid_submission_emits_exactly_one_start_effect() {
    init_logging();
    let input = "https://www.amazon.com/s?k=iphone+15 \n\n  https://www.bestbuy.com/site/searchpage.jsp?st=iphone+15\n   \n";
    let (state, effects) = submit(connected_state(), input);

    assert_eq!(effects.len(), 1);
    let Effect::SubmitScrape { request } = &effects[0] else {
        panic!("expected SubmitScrape, got {effects:?}");
    };
    assert_eq!(
        request.urls,
        vec![
            "https://www.amazon.com/s?k=iphone+15".to_string(),
            "https://www.bestbuy.com/site/searchpage.jsp?st=iphone+15".to_string(),
        ]
    );
    assert_eq!(
        request.target_sites,
        vec!["amazon".to_string(), "bestbuy".to_string(), "walmart".to_string()]
    );
    assert_eq!(request.max_products, 50);
    assert!(request.use_ai_parsing);
    assert!(request.include_images);
    assert!(!request.include_reviews);

    assert!(state.view().form.submitting);
    assert!(state.view().busy);
}

#[test]
fn repeated_submit_while_in_flight_is_ignored() {
    init_logging();
    let (state, effects) = submit(connected_state(), "https://www.amazon.com/s?k=ssd\n");
    assert_eq!(effects.len(), 1);

    let (_, effects) = update(state, Msg::ScrapeSubmitted);
    assert!(effects.is_empty());
}

#[test]
fn form_edits_change_the_request() {
    init_logging();
    let mut state = connected_state();
    for msg in [
        Msg::SiteToggled("walmart".to_string()),
        Msg::MaxProductsChanged(25),
        Msg::OptionToggled(ScrapeOption::Reviews),
        Msg::OptionToggled(ScrapeOption::Images),
    ] {
        let (next, _) = update(state, msg);
        state = next;
    }

    let (_, effects) = submit(state, "https://www.walmart.com/search?q=tv\n");
    let Effect::SubmitScrape { request } = &effects[0] else {
        panic!("expected SubmitScrape, got {effects:?}");
    };
    assert_eq!(
        request.target_sites,
        vec!["amazon".to_string(), "bestbuy".to_string()]
    );
    assert_eq!(request.max_products, 25);
    assert!(request.include_reviews);
    assert!(!request.include_images);
}

#[test]
fn max_products_is_clamped_to_the_allowed_range() {
    init_logging();
    let (state, _) = update(connected_state(), Msg::MaxProductsChanged(0));
    assert_eq!(state.view().form.max_products, 1);

    let (state, _) = update(state, Msg::MaxProductsChanged(5000));
    assert_eq!(state.view().form.max_products, 1000);
}

#[test]
fn demo_click_starts_the_demo_job() {
    init_logging();
    let (state, effects) = update(connected_state(), Msg::DemoClicked);

    assert_eq!(effects, vec![Effect::StartDemo]);
    assert!(state.view().busy);
}

#[test]
fn rejected_start_surfaces_the_error_inline() {
    init_logging();
    let (state, _) = submit(connected_state(), "https://www.amazon.com/s?k=ssd\n");
    let (state, effects) = update(
        state,
        Msg::JobRejected {
            reason: "Rate limit exceeded".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.view().form.submitting);
    assert_eq!(
        state.view().form.notice,
        Some(FormNotice::Error("Error: Rate limit exceeded".to_string()))
    );
}

#[test]
fn url_append_and_clear_edit_the_input() {
    init_logging();
    let (state, _) = update(connected_state(), Msg::UrlAppended("https://a.example.com".to_string()));
    let (state, _) = update(state, Msg::UrlAppended("https://b.example.com".to_string()));
    assert_eq!(
        state.view().form.urls_input,
        "https://a.example.com\nhttps://b.example.com"
    );

    let (state, _) = update(state, Msg::UrlsInputChanged(String::new()));
    assert!(state.view().form.urls_input.is_empty());
}
