pub mod notes;
pub mod patients;
pub mod process;
pub mod time_serde;
pub mod views;

mod error;

pub use error::{Error, Result};
pub use notes::{AudioUpload, CreateNoteRequest};
pub use patients::CreatePatientRequest;
pub use process::ProcessedNote;
pub use views::{
	DeleteResponse, NoteDetailView, NoteSummaryView, NoteView, PatientDetailView, PatientSummary,
	PatientView,
};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use medscribe_config::{Config, SummaryProviderConfig, TranscriptionProviderConfig};
use medscribe_providers::{summary, transcription};
use medscribe_storage::{db::Db, uploads::UploadStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait TranscriptionProvider
where
	Self: Send + Sync,
{
	fn transcribe<'a>(
		&'a self,
		cfg: &'a TranscriptionProviderConfig,
		audio: &'a [u8],
		filename: &'a str,
	) -> BoxFuture<'a, medscribe_providers::Result<String>>;
}

pub trait SummaryProvider
where
	Self: Send + Sync,
{
	fn summarize<'a>(
		&'a self,
		cfg: &'a SummaryProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, medscribe_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub transcription: Arc<dyn TranscriptionProvider>,
	pub summary: Arc<dyn SummaryProvider>,
}
impl Providers {
	pub fn new(
		transcription: Arc<dyn TranscriptionProvider>,
		summary: Arc<dyn SummaryProvider>,
	) -> Self {
		Self { transcription, summary }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { transcription: provider.clone(), summary: provider }
	}
}

/// Patient lifecycle and note ingestion over one database and upload store.
pub struct MedscribeService {
	pub cfg: Config,
	pub db: Db,
	pub uploads: UploadStore,
	pub providers: Providers,
}
impl MedscribeService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let uploads = UploadStore::new(&cfg.storage.uploads);

		Self { cfg, db, uploads, providers }
	}

	/// Releases a stored audio file. Failures are logged and otherwise ignored.
	pub(crate) async fn discard_audio(&self, url: &str) {
		match self.uploads.remove_url(url).await {
			Ok(true) => tracing::debug!(url, "Removed stored audio."),
			Ok(false) => tracing::warn!(url, "Stored audio was already missing."),
			Err(err) => tracing::warn!(error = %err, url, "Failed to remove stored audio."),
		}
	}
}

struct DefaultProviders;
impl TranscriptionProvider for DefaultProviders {
	fn transcribe<'a>(
		&'a self,
		cfg: &'a TranscriptionProviderConfig,
		audio: &'a [u8],
		filename: &'a str,
	) -> BoxFuture<'a, medscribe_providers::Result<String>> {
		Box::pin(transcription::transcribe(cfg, audio, filename))
	}
}
impl SummaryProvider for DefaultProviders {
	fn summarize<'a>(
		&'a self,
		cfg: &'a SummaryProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, medscribe_providers::Result<String>> {
		Box::pin(summary::summarize(cfg, text))
	}
}

/// Identifiers that are not UUIDs cannot name a stored row.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid> {
	Uuid::parse_str(raw.trim()).map_err(|_| Error::not_found(not_found))
}
