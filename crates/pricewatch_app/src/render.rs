use std::fmt::Write as _;

use chrono::{DateTime, Local, NaiveDateTime};
use pricewatch_core::{
    ConnectionState, DashboardViewModel, FormNotice, ProductTableView, SiteTone, StatusTone,
};

const RESET: &str = "\x1b[0m";

fn status_color(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Blue => "\x1b[34m",
        StatusTone::Green => "\x1b[32m",
        StatusTone::Red => "\x1b[31m",
        StatusTone::Gray => "\x1b[90m",
    }
}

fn site_color(tone: SiteTone) -> &'static str {
    match tone {
        SiteTone::Orange => "\x1b[33m",
        SiteTone::Blue => "\x1b[34m",
        SiteTone::Gray => "\x1b[90m",
    }
}

/// Renders the whole dashboard as terminal text.
pub fn render(view: &DashboardViewModel) -> String {
    let mut out = String::new();

    match view.connection {
        ConnectionState::Probing => {
            let _ = writeln!(out, "Connecting to the scraper API...");
            return out;
        }
        ConnectionState::Disconnected => {
            let _ = writeln!(
                out,
                "Connection failed: unable to reach the scraper API. Type 'retry' to try again."
            );
            return out;
        }
        ConnectionState::Connected => {}
    }

    if let Some(job) = &view.job {
        let color = status_color(job.tone);
        let _ = writeln!(out, "Job {} [{color}{}{RESET}]", job.job_id, job.status_label);
        let _ = writeln!(out, "  {}", job.message);
        if let Some(progress) = &job.progress_text {
            let _ = writeln!(out, "  Progress: {progress}");
        }
        if let Some(count) = job.products_scraped {
            let _ = writeln!(out, "  Products scraped: {count}");
        }
    }

    let _ = writeln!(out, "Scraped products ({}):", view.product_count);
    match &view.product_table {
        ProductTableView::Empty => {
            let _ = writeln!(
                out,
                "  No products found. Start a scraping job to see products here."
            );
        }
        ProductTableView::Rows(rows) => {
            for row in rows {
                let color = site_color(row.site_tone);
                let _ = writeln!(
                    out,
                    "  {:<40} {:>12}  {color}{:<8}{RESET} {:<14} {:>5}  {}",
                    truncate(&row.name, 40),
                    row.price_text,
                    row.site,
                    row.rating_text,
                    row.confidence_text,
                    format_timestamp(&row.scraped_at),
                );
            }
        }
    }

    if let Some(analysis) = &view.analysis {
        let _ = writeln!(out, "Competitive analysis:");
        if let Some(total) = analysis.total_products {
            let _ = writeln!(out, "  Total products: {total}");
        }
        if let Some(average) = &analysis.average_price_text {
            let _ = writeln!(out, "  Average price: {average}");
        }
        if let Some(range) = &analysis.price_range_text {
            let _ = writeln!(out, "  Price range: {range}");
        }
        for site in &analysis.per_site {
            let color = site_color(site.tone);
            let _ = write!(out, "  {color}{:<8}{RESET}", site.site);
            match (&site.avg_price_text, site.product_count) {
                (Some(avg), Some(count)) => {
                    let _ = writeln!(out, " avg {avg} over {count} products");
                }
                (Some(avg), None) => {
                    let _ = writeln!(out, " avg {avg}");
                }
                _ => {
                    let _ = writeln!(out, " no data");
                }
            }
        }
        for insight in &analysis.insights {
            let _ = writeln!(out, "  * {insight}");
        }
    }

    if let Some(notice) = &view.form.notice {
        match notice {
            FormNotice::Info(text) => {
                let _ = writeln!(out, "{text}");
            }
            FormNotice::Error(text) => {
                let _ = writeln!(out, "\x1b[31m{text}{RESET}");
            }
        }
    }
    if let Some(status) = &view.status_line {
        let _ = writeln!(out, "\x1b[90m{status}{RESET}");
    }
    if view.busy {
        let _ = writeln!(out, "(working...)");
    }

    out
}

/// Timestamps arrive as RFC 3339, sometimes without an offset. Unparseable
/// values pass through untouched.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}
