use serde::Deserialize;
use serde_json::Value;

use crate::{ApiError, ApiErrorKind};

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisEnvelope {
    pub(crate) analysis: Value,
    #[serde(default)]
    pub(crate) generated_at: Option<String>,
}

/// Per-site statistics from the `price_comparison` member.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteStats {
    pub site: String,
    pub avg_price: Option<f64>,
    pub product_count: Option<u64>,
}

/// The competitive-analysis payload, validated at the boundary.
///
/// The server's `analysis` member must be a JSON object; anything else is a
/// decode error. Individual fields are looked up on demand so the view keeps
/// working when the server adds, renames, or drops members.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitiveAnalysis {
    generated_at: Option<String>,
    fields: serde_json::Map<String, Value>,
}

impl CompetitiveAnalysis {
    pub(crate) fn from_envelope(envelope: AnalysisEnvelope) -> Result<Self, ApiError> {
        match envelope.analysis {
            Value::Object(fields) => Ok(Self {
                generated_at: envelope.generated_at,
                fields,
            }),
            other => Err(ApiError::new(
                ApiErrorKind::Decode,
                format!("analysis payload is not an object: {other}"),
            )),
        }
    }

    pub fn generated_at(&self) -> Option<&str> {
        self.generated_at.as_deref()
    }

    /// Raw access for fields without a typed accessor.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn total_products(&self) -> Option<u64> {
        self.fields.get("total_products")?.as_u64()
    }

    pub fn average_price(&self) -> Option<f64> {
        self.fields.get("average_price")?.as_f64()
    }

    /// `(min, max)` from the `price_range` member.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let range = self.fields.get("price_range")?.as_object()?;
        let min = range.get("min")?.as_f64()?;
        let max = range.get("max")?.as_f64()?;
        Some((min, max))
    }

    /// Per-site statistics, sorted by site name for a stable display order.
    pub fn site_comparison(&self) -> Vec<SiteStats> {
        let Some(Value::Object(comparison)) = self.fields.get("price_comparison") else {
            return Vec::new();
        };
        let mut stats: Vec<SiteStats> = comparison
            .iter()
            .map(|(site, value)| SiteStats {
                site: site.clone(),
                avg_price: value.get("avg_price").and_then(Value::as_f64),
                product_count: value.get("count").and_then(Value::as_u64),
            })
            .collect();
        stats.sort_by(|a, b| a.site.cmp(&b.site));
        stats
    }

    pub fn market_insights(&self) -> Vec<String> {
        let Some(Value::Array(insights)) = self.fields.get("market_insights") else {
            return Vec::new();
        };
        insights
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    }
}
