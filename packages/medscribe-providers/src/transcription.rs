use std::{path::Path, time::Duration};

use reqwest::{
	Body, Client,
	multipart::{Form, Part},
};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{Error, Result};
use medscribe_config::TranscriptionProviderConfig;

/// Sends `audio` to the speech-to-text endpoint and returns the transcript.
///
/// The bytes are staged in a temporary file which is removed when this call returns, whether it
/// succeeds or not.
pub async fn transcribe(
	cfg: &TranscriptionProviderConfig,
	audio: &[u8],
	filename: &str,
) -> Result<String> {
	let api_key = crate::require_key(&cfg.provider_id, cfg.api_key.as_deref())?;

	transcribe_staged(cfg, api_key, audio, filename)
		.await
		.map_err(Error::into_transcription_failure)
}

async fn transcribe_staged(
	cfg: &TranscriptionProviderConfig,
	api_key: &str,
	audio: &[u8],
	filename: &str,
) -> Result<String> {
	let staged = stage_audio(audio, filename).await?;
	let file = tokio::fs::File::open(staged.path()).await?;
	let part = Part::stream_with_length(Body::from(file), audio.len() as u64)
		.file_name(upload_name(filename));
	let form = Form::new().text("model", cfg.model.clone()).part("file", part);
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let res = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.multipart(form)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	tracing::debug!(provider = %cfg.provider_id, bytes = audio.len(), "Audio transcribed.");

	parse_transcription_response(json)
}

async fn stage_audio(audio: &[u8], filename: &str) -> Result<NamedTempFile> {
	let suffix = Path::new(filename)
		.extension()
		.and_then(|ext| ext.to_str())
		.map(|ext| format!(".{ext}"))
		.unwrap_or_default();
	let staged = tempfile::Builder::new().prefix("medscribe-audio-").suffix(&suffix).tempfile()?;

	tokio::fs::write(staged.path(), audio).await?;

	Ok(staged)
}

fn upload_name(filename: &str) -> String {
	Path::new(filename)
		.file_name()
		.and_then(|name| name.to_str())
		.filter(|name| !name.is_empty())
		.unwrap_or("audio")
		.to_string()
}

fn parse_transcription_response(json: Value) -> Result<String> {
	json.get("text").and_then(|text| text.as_str()).map(str::to_string).ok_or_else(|| {
		Error::InvalidResponse { message: "Transcription response is missing text.".to_string() }
	})
}
