//! Pricewatch core: pure state machine and view-model helpers.
//!
//! Everything in this crate is IO-free. The app shell feeds [`Msg`] values
//! into [`update`], executes the returned [`Effect`]s against the API client,
//! and renders the [`DashboardViewModel`] whenever the state reports dirty.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, ScrapeOption};
pub use update::update;
pub use state::{
    AnalysisSummary, AppState, ConnectionState, FormNotice, JobId, JobPhase, JobRecord,
    JobSnapshot, ProductRecord, ScrapeForm, ScrapeRequest, SiteComparison,
};
pub use view_model::{
    format_percent, format_usd, rating_text, site_tone, status_label, status_tone, AnalysisView,
    DashboardViewModel, FormView, JobCardView, ProductRowView, ProductTableView, SiteRowView,
    SiteTone, StatusTone,
};
