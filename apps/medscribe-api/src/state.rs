use std::{sync::Arc, time::Duration};

use crate::rate_limit::RateLimiter;
use medscribe_service::MedscribeService;
use medscribe_storage::db::Db;

pub const API_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const UPLOAD_LIMIT_MESSAGE: &str = "Too many uploads from this IP, please try again later.";

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MedscribeService>,
	pub api_limiter: Arc<RateLimiter>,
	pub upload_limiter: Arc<RateLimiter>,
}
impl AppState {
	/// Connects to Postgres, applies the schema, and prepares the upload directory.
	pub async fn new(config: medscribe_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = MedscribeService::new(config, db);

		service.uploads.ensure_dir().await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: MedscribeService) -> Self {
		let limits = &service.cfg.rate_limit;
		let window = Duration::from_secs(limits.window_secs);
		let api_limiter = RateLimiter::new(window, limits.api_max_requests, API_LIMIT_MESSAGE);
		let upload_limiter =
			RateLimiter::new(window, limits.upload_max_requests, UPLOAD_LIMIT_MESSAGE);

		Self {
			service: Arc::new(service),
			api_limiter: Arc::new(api_limiter),
			upload_limiter: Arc::new(upload_limiter),
		}
	}
}
