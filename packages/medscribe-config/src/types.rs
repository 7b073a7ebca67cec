use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub rate_limit: RateLimit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Origins allowed to call the API from a browser.
	#[serde(default = "default_cors_origins")]
	pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub uploads: Uploads,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Uploads {
	pub dir: PathBuf,
	/// Path prefix under which stored audio is served, e.g. "/uploads".
	#[serde(default = "default_url_prefix")]
	pub url_prefix: String,
	#[serde(default = "default_max_audio_bytes")]
	pub max_audio_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub transcription: TranscriptionProviderConfig,
	pub summary: SummaryProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Absent until configured; requests fail with a missing-credential error.
	#[serde(default)]
	pub api_key: Option<String>,
	pub path: String,
	#[serde(default = "default_transcription_model")]
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub path: String,
	#[serde(default = "default_summary_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
	pub window_secs: u64,
	/// Ceiling for all API traffic per client and window.
	pub api_max_requests: u32,
	/// Ceiling for note uploads per client and window.
	pub upload_max_requests: u32,
}
impl Default for RateLimit {
	fn default() -> Self {
		Self { window_secs: 15 * 60, api_max_requests: 100, upload_max_requests: 10 }
	}
}

fn default_cors_origins() -> Vec<String> {
	vec!["http://localhost:3000".to_string()]
}

fn default_url_prefix() -> String {
	"/uploads".to_string()
}

fn default_max_audio_bytes() -> u64 {
	10 * 1024 * 1024
}

fn default_transcription_model() -> String {
	"whisper-1".to_string()
}

fn default_summary_model() -> String {
	"gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
	0.3
}

fn default_max_tokens() -> u32 {
	500
}
