mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Postgres, Providers, RateLimit, Service, Storage, SummaryProviderConfig,
	TranscriptionProviderConfig, Uploads,
};

use std::{env, fs, net::SocketAddr, path::Path};

/// Environment variable holding the AI provider credential.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_UPLOAD_DIR: &str = "UPLOAD_DIR";
/// Comma-separated list of allowed browser origins.
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";
pub const ENV_PORT: &str = "PORT";

pub fn load(path: &Path) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);
	apply_env_overrides(&mut cfg, lookup)?;
	validate(&cfg)?;

	Ok(cfg)
}

/// Layers process-level settings over the file. Provider keys are only filled when the file
/// leaves them empty.
pub fn apply_env_overrides<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

	if let Some(key) = non_blank(ENV_API_KEY) {
		if cfg.providers.transcription.api_key.is_none() {
			cfg.providers.transcription.api_key = Some(key.clone());
		}
		if cfg.providers.summary.api_key.is_none() {
			cfg.providers.summary.api_key = Some(key);
		}
	}
	if let Some(dir) = non_blank(ENV_UPLOAD_DIR) {
		cfg.storage.uploads.dir = dir.into();
	}
	if let Some(origins) = non_blank(ENV_CORS_ORIGINS) {
		cfg.service.cors_origins = origins
			.split(',')
			.map(|origin| origin.trim().to_string())
			.filter(|origin| !origin.is_empty())
			.collect();
	}
	if let Some(port) = non_blank(ENV_PORT) {
		let port: u16 = port.trim().parse().map_err(|_| Error::Validation {
			message: format!("{ENV_PORT} must be a valid TCP port."),
		})?;
		let mut addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| {
			Error::Validation { message: "service.http_bind must be a socket address.".to_string() }
		})?;

		addr.set_port(port);

		cfg.service.http_bind = addr.to_string();
	}

	Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address.".to_string(),
		});
	}
	if cfg.service.cors_origins.iter().any(|origin| origin.trim().is_empty()) {
		return Err(Error::Validation {
			message: "service.cors_origins must not contain empty entries.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.uploads.dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.uploads.dir must be non-empty.".to_string(),
		});
	}
	if !cfg.storage.uploads.url_prefix.starts_with('/')
		|| cfg.storage.uploads.url_prefix.trim_matches('/').is_empty()
	{
		return Err(Error::Validation {
			message: "storage.uploads.url_prefix must start with '/' and name a path.".to_string(),
		});
	}
	if cfg.storage.uploads.max_audio_bytes == 0 {
		return Err(Error::Validation {
			message: "storage.uploads.max_audio_bytes must be greater than zero.".to_string(),
		});
	}

	for (label, api_base, path, timeout_ms) in [
		(
			"transcription",
			&cfg.providers.transcription.api_base,
			&cfg.providers.transcription.path,
			cfg.providers.transcription.timeout_ms,
		),
		(
			"summary",
			&cfg.providers.summary.api_base,
			&cfg.providers.summary.path,
			cfg.providers.summary.timeout_ms,
		),
	] {
		if api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_base must be non-empty."),
			});
		}
		if !path.starts_with('/') {
			return Err(Error::Validation {
				message: format!("providers.{label}.path must start with '/'."),
			});
		}
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	let temperature = cfg.providers.summary.temperature;

	if !temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.summary.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&temperature) {
		return Err(Error::Validation {
			message: "providers.summary.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.providers.summary.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.summary.max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.rate_limit.window_secs == 0 {
		return Err(Error::Validation {
			message: "rate_limit.window_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.rate_limit.api_max_requests == 0 || cfg.rate_limit.upload_max_requests == 0 {
		return Err(Error::Validation {
			message: "rate_limit request ceilings must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.transcription
		.api_key
		.as_deref()
		.map(|key| key.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.transcription.api_key = None;
	}
	if cfg.providers.summary.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.summary.api_key = None;
	}
}
