use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use medscribe_config::SummaryProviderConfig;

/// Fixed instruction sent ahead of every note.
pub const SOAP_SYSTEM_PROMPT: &str = "You are a medical AI assistant. Summarize the following \
medical note in SOAP format with exactly four sections: Subjective, Objective, Assessment, Plan. \
Focus on key medical information and maintain professional medical terminology. Do not include \
any personal opinions or non-medical content.";

pub async fn summarize(cfg: &SummaryProviderConfig, text: &str) -> Result<String> {
	let api_key = crate::require_key(&cfg.provider_id, cfg.api_key.as_deref())?;

	summarize_with_key(cfg, api_key, text).await.map_err(Error::into_summarization_failure)
}

async fn summarize_with_key(cfg: &SummaryProviderConfig, api_key: &str, text: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let res = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(&request_body(cfg, text))
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_summary_response(json)
}

pub fn request_body(cfg: &SummaryProviderConfig, text: &str) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"messages": [
			{ "role": "system", "content": SOAP_SYSTEM_PROMPT },
			{ "role": "user", "content": text },
		],
		"max_tokens": cfg.max_tokens,
		"temperature": cfg.temperature,
	})
}

/// A completion without message content yields an empty summary, not an error.
fn parse_summary_response(json: Value) -> Result<String> {
	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "Summary response must be a JSON object.".to_string(),
		});
	}

	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::trim)
		.unwrap_or_default();

	if content.is_empty() {
		tracing::warn!("Summary response carried no message content.");
	}

	Ok(content.to_string())
}
