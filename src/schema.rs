use crate::dynamic::DynamicMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical shape every upstream analysis document is normalized into.
///
/// Each field is independently optional. `None` means no recognised key was
/// present in the source; `Some` with an empty collection means the key was
/// present but carried no entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_spending: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_spending: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_spending: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_spending: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_spending: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_counts: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_spending: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<IndexMap<String, DynamicMap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<DynamicMap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_insights: Option<Vec<DynamicMap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_advice: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_averages: Option<DynamicMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AnalysisResult {
    /// True when no field could be resolved from the source document.
    pub fn is_empty(&self) -> bool {
        *self == AnalysisResult::default()
    }

    /// Number of canonical fields that were resolved.
    pub fn resolved_field_count(&self) -> usize {
        [
            self.transaction_count.is_some(),
            self.total_spending.is_some(),
            self.weekly_spending.is_some(),
            self.monthly_spending.is_some(),
            self.yearly_spending.is_some(),
            self.category_spending.is_some(),
            self.insurance_counts.is_some(),
            self.insurance_spending.is_some(),
            self.recommendations.is_some(),
            self.transactions.is_some(),
            self.category_insights.is_some(),
            self.financial_advice.is_some(),
            self.daily_averages.is_some(),
            self.summary.is_some(),
        ]
        .into_iter()
        .filter(|resolved| *resolved)
        .count()
    }
}

/// A recommended insurance plan as returned by the prediction service.
///
/// Only the fields used to build comparison prompts are kept; everything
/// else in the upstream record is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    #[serde(rename = "plan", default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub insurance_type: String,
    #[serde(rename = "policy_term_range", default)]
    pub term_range: Option<String>,
    #[serde(default)]
    pub sum_assured_range: Option<String>,
    #[serde(rename = "riders_available", default)]
    pub riders: Option<String>,
    #[serde(rename = "medical_required", default)]
    pub medical_requirement: Option<String>,
    #[serde(default)]
    pub payment_option: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub premium_range: Option<String>,
}

/// Body of a comparison request: the prediction service's recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<PlanRecord>,
}
