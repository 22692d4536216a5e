use crate::error::{InsightError, Result};
use crate::llm::types::GenerateContentResponse;
use serde_json::Value;

const FENCE: &str = "```";

/// Pulls the text of the first part of the first candidate.
pub fn reply_text(reply: &GenerateContentResponse) -> Result<&str> {
    let candidate = reply
        .candidates
        .as_ref()
        .ok_or_else(|| InsightError::UpstreamProtocolError("no candidates returned".to_string()))?
        .first()
        .ok_or_else(|| InsightError::UpstreamProtocolError("empty candidates list".to_string()))?;

    let content = candidate.content.as_ref().ok_or_else(|| {
        InsightError::UpstreamProtocolError(match &candidate.finish_reason {
            Some(reason) => format!("candidate has no content (finish reason {})", reason),
            None => "candidate has no content".to_string(),
        })
    })?;

    content
        .parts
        .first()
        .ok_or_else(|| InsightError::UpstreamProtocolError("no parts in content".to_string()))?
        .text
        .as_deref()
        .ok_or_else(|| InsightError::UpstreamProtocolError("first part is not text".to_string()))
}

/// Removes a markdown code fence around the payload and trims whitespace.
///
/// The opening fence may carry a language tag (```` ```json ````); anything
/// after the tag on the same line is payload. Prose before the fence is
/// dropped and a missing closing fence is tolerated. A lone fence after the
/// payload leaves the text before it.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find(FENCE) else {
        return trimmed;
    };

    let body = trimmed[start + FENCE.len()..]
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let inner = match body.find(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    };

    if inner.is_empty() {
        trimmed[..start].trim()
    } else {
        inner
    }
}

fn invalid_payload(payload: &str, source: serde_json::Error) -> InsightError {
    InsightError::InvalidJsonPayload {
        payload: payload.to_string(),
        source,
    }
}

/// Extracts the JSON payload from a language model reply.
///
/// A reply that already parses is returned as is, so backticks inside JSON
/// strings survive. Otherwise the fenced body is tried. The text is
/// validated with a full parse but returned as text.
pub fn extract_json(reply: &GenerateContentResponse) -> Result<String> {
    let text = reply_text(reply)?.trim();
    if serde_json::from_str::<Value>(text).is_ok() {
        return Ok(text.to_string());
    }

    let cleaned = strip_code_fence(text);
    serde_json::from_str::<Value>(cleaned)
        .map(|_| cleaned.to_string())
        .map_err(|source| invalid_payload(cleaned, source))
}
