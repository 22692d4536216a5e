// Prompt construction for insurance plan comparisons

use crate::schema::PlanRecord;
use crate::utils::{range_floor, split_riders, term_bounds};
use serde_json::Value;
use std::fmt;

pub const COMPARISON_PREAMBLE: &str = r#"Please generate a JSON output comparing insurance policies.

## INPUT FORMAT
Each policy below is one JSON array with exactly 10 fields in this order:
1. Insurance Name (String)
2. Insurance Type (String)
3. Policy Term Min (Number, years)
4. Policy Term Max (Number, years)
5. Sum Assured Min (Number)
6. Key Benefits/Riders (Array of Strings)
7. Medical Considerations (String)
8. Premium Payment Option (String)
9. Features Description (String)
10. Sample Premium (Number)

## INTERPRETATION RULES
- All monetary amounts are in Indian Rupees (INR). Report them as plain numbers without currency symbols or separators.
- Sample Premium is the lowest premium quoted for the plan. Treat it as an indicative annual premium, not a final quote.
- A Policy Term Min or Sum Assured Min of 0, or a Policy Term Max of 100, means the value was not available. Do not present it as a real limit.
- A rider list may contain stray whitespace; treat riders case- and space-insensitively.

## OUTPUT FORMAT
Return ONLY valid JSON with this structure:
{
  "insurance_plans": [
    {
      "name": "...",
      "type": "...",
      "policy_term": { "min": 0, "max": 0 },
      "sum_assured_min": 0,
      "riders": ["..."],
      "medical_considerations": "...",
      "premium_payment_option": "...",
      "features": "...",
      "sample_premium": 0,
      "pros": ["..."],
      "cons": ["..."]
    }
  ],
  "comparison_summary": {
    "best_for_coverage": "...",
    "best_for_affordability": "...",
    "best_for_flexibility": "...",
    "overall_recommendation": "..."
  }
}

Ensure the output JSON strictly adheres to the expected structure.

I want to compare the policies from the following list:
"#;

const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description";

/// A fully rendered comparison prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPrompt(String);

impl ComparisonPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ComparisonPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComparisonPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encodes one plan as a JSON array literal in the order the preamble lists.
pub fn plan_line(plan: &PlanRecord) -> String {
    let (term_min, term_max) = term_bounds(plan.term_range.as_deref());
    let riders = split_riders(plan.riders.as_deref())
        .into_iter()
        .map(Value::String)
        .collect();

    Value::Array(vec![
        Value::from(plan.name.as_str()),
        Value::from(plan.insurance_type.as_str()),
        Value::from(term_min),
        Value::from(term_max),
        Value::from(range_floor(plan.sum_assured_range.as_deref())),
        Value::Array(riders),
        Value::from(plan.medical_requirement.as_deref().unwrap_or(UNKNOWN)),
        Value::from(plan.payment_option.as_deref().unwrap_or(UNKNOWN)),
        Value::from(plan.features.as_deref().unwrap_or(NO_DESCRIPTION)),
        Value::from(range_floor(plan.premium_range.as_deref())),
    ])
    .to_string()
}

/// Builds the comparison prompt. Output depends only on `plans` and their order.
pub fn build_prompt(plans: &[PlanRecord]) -> ComparisonPrompt {
    let lines: Vec<String> = plans.iter().map(plan_line).collect();

    let mut prompt = String::from(COMPARISON_PREAMBLE);
    prompt.push_str("[\n");
    prompt.push_str(&lines.join(",\n"));
    prompt.push_str("\n]");

    ComparisonPrompt(prompt)
}
