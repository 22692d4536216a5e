use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::error::Result;
use crate::llm::extractor::extract_json;
use crate::llm::prompts::{build_prompt, ComparisonPrompt};
use crate::llm::types::{GenerateContentRequest, GenerateContentResponse};
use crate::schema::{PlanRecord, RecommendationResponse};

/// Anything that can answer a `generateContent` request.
///
/// Implementations report transport failures (including timeouts) as
/// `InsightError::UpstreamUnavailable` and must not retry on their own.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

#[async_trait]
impl<T: ContentGenerator + ?Sized> ContentGenerator for Arc<T> {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        (**self).generate_content(request).await
    }
}

/// Turns a list of recommended plans into a JSON comparison from the model.
pub struct ComparisonAdapter<G> {
    generator: G,
}

impl<G: ContentGenerator> ComparisonAdapter<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Builds the prompt, queries the model and returns the validated JSON text.
    pub async fn compare(&self, plans: &[PlanRecord]) -> Result<String> {
        let prompt = build_prompt(plans);
        info!("Requesting comparison of {} insurance plans", plans.len());
        self.compare_prompt(&prompt).await
    }

    pub async fn compare_response(&self, response: &RecommendationResponse) -> Result<String> {
        self.compare(&response.recommendations).await
    }

    pub async fn compare_prompt(&self, prompt: &ComparisonPrompt) -> Result<String> {
        debug!("Comparison prompt is {} bytes", prompt.as_str().len());

        let request = GenerateContentRequest::user_prompt(prompt.as_str());
        let reply = self.generator.generate_content(&request).await?;
        let json = extract_json(&reply)?;

        debug!("Extracted {} bytes of comparison JSON", json.len());
        Ok(json)
    }
}
