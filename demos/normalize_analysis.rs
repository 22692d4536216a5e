use insurance_insight::{normalize_output, AnalysisResult, DynamicMap, DynamicValue};
use std::env;
use std::fs;

// Simulated stdout of the analysis script: log lines around the JSON document.
const MOCK_SCRIPT_OUTPUT: &str = r#"
2025-04-20 10:01:02 INFO Loaded 500 transactions from upload.csv
2025-04-20 10:01:05 INFO Labeled insurance categories
{
  "transaction_count": 500,
  "total_spending": 268543.74,
  "spending_patterns": {
    "top_categories": { "Salary": 114505.23, "Investment": 68483.47 },
    "top_insurance_labels": { "Other": 163, "Credit": 65 },
    "weekly_trend": { "2025-W08": 2111.15, "2025-W09": 112.11 },
    "monthly_trend": { "Jan 2025": 18211.54, "Feb 2025": 14391.81 }
  },
  "category_insights": {
    "Salary": { "total_spent": 114505.23, "transaction_count": 133, "recommended_insurance": "Other" }
  },
  "insurance_recommendations": {
    "Credit": { "priority": "Medium", "percentage": 21.5 }
  }
}
2025-04-20 10:01:09 INFO Analysis complete
"#;

fn print_mapping(title: &str, values: Option<&DynamicMap>) {
    match values {
        Some(map) => {
            println!("{} ({} entries)", title, map.len());
            for (label, value) in map {
                println!("  {:<12} {}", label, serde_json::to_string(value).unwrap_or_default());
            }
        }
        None => println!("{}: not reported", title),
    }
}

fn main() -> anyhow::Result<()> {
    // Pass a file path to normalize real script output instead of the mock.
    let output = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => MOCK_SCRIPT_OUTPUT.to_string(),
    };

    println!("🔍 Normalizing analysis output...");
    let result: AnalysisResult = normalize_output(&output)?;

    println!(
        "✅ Resolved {} fields ({} transactions)\n",
        result.resolved_field_count(),
        result
            .transaction_count
            .map_or_else(|| "unknown".to_string(), |n| n.to_string())
    );

    print_mapping("Weekly spending", result.weekly_spending.as_ref());
    print_mapping("Category spending", result.category_spending.as_ref());
    print_mapping("Insurance counts", result.insurance_counts.as_ref());

    if let Some(insights) = &result.category_insights {
        println!("Category insights");
        for insight in insights {
            let category = insight
                .get("category")
                .and_then(DynamicValue::as_str)
                .unwrap_or("?");
            let spent = insight
                .get("total_spent")
                .and_then(DynamicValue::as_f64)
                .unwrap_or(0.0);
            println!("  {:<12} {:.2}", category, spent);
        }
    }

    println!("\n📄 Canonical JSON:");
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
