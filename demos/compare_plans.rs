use dotenv::dotenv;
use insurance_insight::{ComparisonAdapter, GeminiClient, RecommendationResponse};
use std::fs::File;
use std::io::Write;

// Recommendations as returned by the prediction service.
const MOCK_RECOMMENDATIONS: &str = r#"{
  "recommendations": [
    {
      "plan": "Secure Term Plus",
      "confidence": 0.87,
      "type": "Term Life",
      "policy_term_range": "10-40",
      "sum_assured_range": "₹25,00,000-₹5,00,00,000",
      "riders_available": "Accidental Death,Critical Illness,Waiver of Premium",
      "medical_required": "Yes",
      "payment_option": "Monthly",
      "features": "Level cover with optional return of premium",
      "premium_range": "₹8,000-₹25,000"
    },
    {
      "plan": "Family Health Shield",
      "confidence": 0.74,
      "type": "Health",
      "policy_term_range": "1-3",
      "sum_assured_range": "₹5,00,000-₹1,00,00,000",
      "riders_available": "Maternity,OPD Cover",
      "medical_required": "No",
      "payment_option": "Annual",
      "premium_range": "₹12,500-₹40,000"
    }
  ]
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    println!("🚀 Starting insurance plan comparison...");

    let request: RecommendationResponse = serde_json::from_str(MOCK_RECOMMENDATIONS)?;
    println!("📋 Loaded {} plans.", request.recommendations.len());

    // GEMINI_API_URL and GEMINI_API_KEY must be set (or present in .env)
    let client = GeminiClient::from_env()?;
    let adapter = ComparisonAdapter::new(client);

    println!("🤖 Sending comparison request...");
    let comparison = adapter.compare_response(&request).await?;

    let pretty = serde_json::to_string_pretty(&serde_json::from_str::<serde_json::Value>(
        &comparison,
    )?)?;
    println!("{}", pretty);

    let mut file = File::create("plan_comparison.json")?;
    file.write_all(pretty.as_bytes())?;
    println!("💾 Saved comparison to plan_comparison.json");

    Ok(())
}
