//! Normalization of transaction-analysis responses.
//!
//! The analysis backend has emitted two document layouts over time: a flat
//! one with `weekly_spending`, `category_insights` arrays and so on, and a
//! nested one that groups trends under `spending_patterns` and keys category
//! insights by name. Both are mapped onto [`AnalysisResult`] by a single
//! table of probes. Each canonical field lists the key paths to try, nested
//! layout first; the first path holding a node of the expected shape wins.

use crate::dynamic::{
    parse_json, to_mapping, to_mapping_of_mappings, to_sequence, DynamicMap, DynamicValue,
};
use crate::error::{InsightError, Result};
use crate::schema::AnalysisResult;
use log::debug;
use serde_json::Value;

/// Expected JSON shape at a probed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
    /// An object whose values are objects, flattened into a sequence with the
    /// key copied into the named field of each entry.
    Keyed(&'static str),
    Integer,
    Number,
    Text,
}

impl Shape {
    pub fn accepts(&self, node: &Value) -> bool {
        match self {
            Shape::Object | Shape::Keyed(_) => node.is_object(),
            Shape::Array => node.is_array(),
            Shape::Integer => node.as_i64().is_some(),
            Shape::Number => node.is_number(),
            Shape::Text => node.is_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub path: &'static [&'static str],
    pub shape: Shape,
}

impl Probe {
    pub const fn new(path: &'static [&'static str], shape: Shape) -> Self {
        Self { path, shape }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TransactionCount,
    TotalSpending,
    WeeklySpending,
    MonthlySpending,
    YearlySpending,
    CategorySpending,
    InsuranceCounts,
    InsuranceSpending,
    Recommendations,
    Transactions,
    CategoryInsights,
    FinancialAdvice,
    DailyAverages,
    Summary,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub probes: &'static [Probe],
}

const SPENDING_PATTERNS: &str = "spending_patterns";

/// Resolution table for the known upstream layouts, nested paths first.
pub const RESOLUTION_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::TransactionCount,
        probes: &[Probe::new(&["transaction_count"], Shape::Integer)],
    },
    FieldRule {
        field: Field::TotalSpending,
        probes: &[Probe::new(&["total_spending"], Shape::Number)],
    },
    FieldRule {
        field: Field::WeeklySpending,
        probes: &[
            Probe::new(&[SPENDING_PATTERNS, "weekly_trend"], Shape::Object),
            Probe::new(&["weekly_spending"], Shape::Object),
        ],
    },
    FieldRule {
        field: Field::MonthlySpending,
        probes: &[
            Probe::new(&[SPENDING_PATTERNS, "monthly_trend"], Shape::Object),
            Probe::new(&["monthly_spending"], Shape::Object),
        ],
    },
    FieldRule {
        field: Field::YearlySpending,
        probes: &[Probe::new(&["yearly_spending"], Shape::Object)],
    },
    FieldRule {
        field: Field::CategorySpending,
        probes: &[
            Probe::new(&[SPENDING_PATTERNS, "top_categories"], Shape::Object),
            Probe::new(&["category_spending"], Shape::Object),
        ],
    },
    FieldRule {
        field: Field::InsuranceCounts,
        probes: &[
            Probe::new(&[SPENDING_PATTERNS, "top_insurance_labels"], Shape::Object),
            Probe::new(&["insurance_counts"], Shape::Object),
        ],
    },
    FieldRule {
        field: Field::InsuranceSpending,
        probes: &[Probe::new(&["insurance_spending"], Shape::Object)],
    },
    FieldRule {
        field: Field::Recommendations,
        probes: &[
            Probe::new(&["insurance_recommendations"], Shape::Object),
            Probe::new(&["recommendations"], Shape::Object),
        ],
    },
    FieldRule {
        field: Field::Transactions,
        probes: &[Probe::new(&["transactions"], Shape::Array)],
    },
    FieldRule {
        field: Field::CategoryInsights,
        probes: &[
            Probe::new(&["category_insights"], Shape::Keyed("category")),
            Probe::new(&["category_insights"], Shape::Array),
        ],
    },
    FieldRule {
        field: Field::FinancialAdvice,
        probes: &[Probe::new(&["financial_advice"], Shape::Object)],
    },
    FieldRule {
        field: Field::DailyAverages,
        probes: &[
            Probe::new(&[SPENDING_PATTERNS, "daily_averages"], Shape::Object),
            Probe::new(&["daily_averages"], Shape::Object),
        ],
    },
    FieldRule {
        field: Field::Summary,
        probes: &[Probe::new(&["summary"], Shape::Text)],
    },
];

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(key))
}

/// Returns the node and shape of the first probe that matches.
pub fn resolve<'a>(root: &'a Value, probes: &[Probe]) -> Option<(&'a Value, Shape)> {
    probes.iter().find_map(|probe| {
        lookup(root, probe.path)
            .filter(|node| probe.shape.accepts(node))
            .map(|node| (node, probe.shape))
    })
}

fn promote_keyed(node: &Value, key_field: &str) -> Vec<DynamicMap> {
    to_mapping_of_mappings(Some(node))
        .into_iter()
        .map(|(key, mut entry)| {
            entry.insert(key_field.to_string(), DynamicValue::String(key));
            entry
        })
        .collect()
}

fn project_sequence(node: &Value, shape: Shape) -> Vec<DynamicMap> {
    match shape {
        Shape::Keyed(key_field) => promote_keyed(node, key_field),
        _ => to_sequence(Some(node)),
    }
}

fn apply(result: &mut AnalysisResult, field: Field, node: &Value, shape: Shape) {
    let mapping = || Some(to_mapping(Some(node)));

    match field {
        Field::TransactionCount => result.transaction_count = node.as_i64(),
        Field::TotalSpending => result.total_spending = node.as_f64(),
        Field::WeeklySpending => result.weekly_spending = mapping(),
        Field::MonthlySpending => result.monthly_spending = mapping(),
        Field::YearlySpending => result.yearly_spending = mapping(),
        Field::CategorySpending => result.category_spending = mapping(),
        Field::InsuranceCounts => result.insurance_counts = mapping(),
        Field::InsuranceSpending => result.insurance_spending = mapping(),
        Field::Recommendations => {
            result.recommendations = Some(to_mapping_of_mappings(Some(node)))
        }
        Field::Transactions => result.transactions = Some(project_sequence(node, shape)),
        Field::CategoryInsights => {
            result.category_insights = Some(project_sequence(node, shape))
        }
        Field::FinancialAdvice => result.financial_advice = mapping(),
        Field::DailyAverages => result.daily_averages = mapping(),
        Field::Summary => result.summary = node.as_str().map(str::to_string),
    }
}

/// Stateless normalizer driven by a resolution table.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisNormalizer {
    rules: &'static [FieldRule],
}

impl Default for AnalysisNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisNormalizer {
    pub fn new() -> Self {
        Self {
            rules: RESOLUTION_RULES,
        }
    }

    /// Use a custom table, e.g. one extended with rows for a newer layout.
    pub fn with_rules(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    pub fn normalize(&self, raw_json: &str) -> Result<AnalysisResult> {
        let root = parse_json(raw_json)
            .map_err(|e| InsightError::MalformedResponse(format!("invalid JSON: {}", e)))?;
        self.normalize_value(&root)
    }

    pub fn normalize_value(&self, root: &Value) -> Result<AnalysisResult> {
        if !root.is_object() {
            return Err(InsightError::MalformedResponse(format!(
                "expected a JSON object at the top level, found {}",
                DynamicValue::from(root).type_name()
            )));
        }

        let mut result = AnalysisResult::default();
        for rule in self.rules {
            if let Some((node, shape)) = resolve(root, rule.probes) {
                apply(&mut result, rule.field, node, shape);
            }
        }

        debug!(
            "Normalized analysis response: {} of {} fields resolved",
            result.resolved_field_count(),
            self.rules.len()
        );

        Ok(result)
    }

    /// Normalizes the stdout of the analysis script.
    ///
    /// The script logs around its JSON document, so only the span from the
    /// first `{` to the last `}` is parsed.
    pub fn normalize_output(&self, output: &str) -> Result<AnalysisResult> {
        let start = output.find('{');
        let end = output.rfind('}');

        match (start, end) {
            (Some(s), Some(e)) if s < e => self.normalize(&output[s..=e]),
            _ => Err(InsightError::MalformedResponse(
                "no JSON object found in analysis output".to_string(),
            )),
        }
    }
}

pub fn normalize(raw_json: &str) -> Result<AnalysisResult> {
    AnalysisNormalizer::new().normalize(raw_json)
}

pub fn normalize_output(output: &str) -> Result<AnalysisResult> {
    AnalysisNormalizer::new().normalize_output(output)
}
