//! # Insurance Insight
//!
//! Response normalization and prompt adaptation for an insurance advisory
//! backend. The crate sits between an HTTP layer and two external services:
//! a transaction-analysis engine that emits loosely structured JSON, and a
//! Gemini-style language model that compares insurance plans.
//!
//! ## Core Concepts
//!
//! - **DynamicValue**: A lossless tagged union for arbitrary JSON that keeps integers and floats apart
//! - **Resolution Table**: Per-field key paths that map both known analysis layouts onto one result
//! - **AnalysisResult**: The canonical, fully optional shape of an analysis response
//! - **Comparison Prompt**: A deterministic prompt listing each plan as a JSON array literal
//! - **Reply Extraction**: Pulling the JSON payload out of a fenced, free-text model reply
//!
//! ## Example
//!
//! ```rust,ignore
//! use insurance_insight::*;
//!
//! let result = normalize(r#"{
//!     "spending_patterns": { "weekly_trend": { "2025-W08": 2111.15 } },
//!     "category_insights": { "Salary": { "total_spent": 114505.23 } }
//! }"#)?;
//! assert!(result.weekly_spending.is_some());
//!
//! let client = GeminiClient::from_env()?;
//! let adapter = ComparisonAdapter::new(client);
//! let comparison_json = adapter.compare(&plans).await?;
//! ```

pub mod analysis;
pub mod dynamic;
pub mod error;
pub mod llm;
pub mod schema;
pub mod utils;

pub use analysis::{normalize, normalize_output, AnalysisNormalizer, RESOLUTION_RULES};
pub use dynamic::{
    parse_json, to_dynamic_value, to_mapping, to_mapping_of_mappings, to_sequence, DynamicMap,
    DynamicValue,
};
pub use error::{InsightError, Result};
pub use llm::*;
pub use schema::*;
