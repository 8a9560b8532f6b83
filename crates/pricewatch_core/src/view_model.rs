use crate::{
    AnalysisSummary, ConnectionState, FormNotice, JobId, JobPhase, JobRecord, ProductRecord,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViewModel {
    pub connection: ConnectionState,
    pub job: Option<JobCardView>,
    pub product_table: ProductTableView,
    pub product_count: usize,
    pub analysis: Option<AnalysisView>,
    pub form: FormView,
    /// A start request or polling session is in flight.
    pub busy: bool,
    /// Last background-load failure, if any.
    pub status_line: Option<String>,
    pub dirty: bool,
}

/// Display color class derived from a job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Blue,
    Green,
    Red,
    Gray,
}

/// Display color class derived from a source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteTone {
    Orange,
    Blue,
    Gray,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobCardView {
    pub job_id: JobId,
    pub status_label: &'static str,
    pub tone: StatusTone,
    pub message: String,
    pub progress: Option<f64>,
    pub progress_text: Option<String>,
    pub products_scraped: Option<u64>,
}

/// The product table projects an explicit no-data state instead of an empty
/// list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductTableView {
    #[default]
    Empty,
    Rows(Vec<ProductRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRowView {
    pub name: String,
    pub url: String,
    pub price_text: String,
    pub site: String,
    pub site_tone: SiteTone,
    pub rating_text: String,
    pub confidence_text: String,
    pub scraped_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRowView {
    pub site: String,
    pub tone: SiteTone,
    pub avg_price_text: Option<String>,
    pub product_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    pub total_products: Option<u64>,
    pub average_price_text: Option<String>,
    pub price_range_text: Option<String>,
    pub per_site: Vec<SiteRowView>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub urls_input: String,
    pub sites: Vec<String>,
    pub max_products: u32,
    pub use_ai_parsing: bool,
    pub include_images: bool,
    pub include_reviews: bool,
    pub notice: Option<FormNotice>,
    pub submitting: bool,
}

/// `0.42` renders as `"42%"`, rounded to the nearest whole percent.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

/// US-dollar text with thousands separators, e.g. `"$1,199.99"`.
pub fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let dollars: String = grouped.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{sign}${dollars}.{fraction:02}")
}

pub fn status_label(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::Queued => "Queued",
        JobPhase::Running => "Running",
        JobPhase::Completed => "Completed",
        JobPhase::Failed => "Failed",
        JobPhase::Unknown => "Unknown",
    }
}

pub fn status_tone(phase: JobPhase) -> StatusTone {
    match phase {
        JobPhase::Running => StatusTone::Blue,
        JobPhase::Completed => StatusTone::Green,
        JobPhase::Failed => StatusTone::Red,
        JobPhase::Queued | JobPhase::Unknown => StatusTone::Gray,
    }
}

pub fn site_tone(site: &str) -> SiteTone {
    match site.to_ascii_lowercase().as_str() {
        "amazon" => SiteTone::Orange,
        "bestbuy" | "walmart" => SiteTone::Blue,
        _ => SiteTone::Gray,
    }
}

/// `"4.5 ★ (1250)"`, or a placeholder when the product has no rating.
pub fn rating_text(rating: Option<f64>, review_count: Option<u64>) -> String {
    match rating {
        Some(value) => match review_count {
            Some(count) => format!("{value:.1} ★ ({count})"),
            None => format!("{value:.1} ★"),
        },
        None => "N/A".to_string(),
    }
}

pub(crate) fn job_card(job: &JobRecord) -> JobCardView {
    JobCardView {
        job_id: job.id.clone(),
        status_label: status_label(job.phase),
        tone: status_tone(job.phase),
        message: job.message.clone(),
        progress: job.progress,
        progress_text: job.progress.map(format_percent),
        products_scraped: job.products_scraped,
    }
}

pub(crate) fn project_products(products: &[ProductRecord]) -> ProductTableView {
    if products.is_empty() {
        return ProductTableView::Empty;
    }
    ProductTableView::Rows(
        products
            .iter()
            .map(|product| ProductRowView {
                name: product.name.clone(),
                url: product.url.clone(),
                price_text: format_usd(product.price),
                site: product.source_site.clone(),
                site_tone: site_tone(&product.source_site),
                rating_text: rating_text(product.rating, product.review_count),
                confidence_text: format_percent(product.confidence_score),
                scraped_at: product.scraped_at.clone(),
            })
            .collect(),
    )
}

pub(crate) fn project_analysis(summary: &AnalysisSummary) -> AnalysisView {
    AnalysisView {
        total_products: summary.total_products,
        average_price_text: summary.average_price.map(format_usd),
        price_range_text: match (summary.price_min, summary.price_max) {
            (Some(low), Some(high)) => {
                Some(format!("{} - {}", format_usd(low), format_usd(high)))
            }
            _ => None,
        },
        per_site: summary
            .per_site
            .iter()
            .map(|comparison| SiteRowView {
                site: comparison.site.clone(),
                tone: site_tone(&comparison.site),
                avg_price_text: comparison.avg_price.map(format_usd),
                product_count: comparison.product_count,
            })
            .collect(),
        insights: summary.insights.clone(),
    }
}
