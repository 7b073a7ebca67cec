use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{Error, Result};

const FALLBACK_NAME: &str = "audio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
	pub file_name: String,
	pub url: String,
}

/// Audio files kept on local disk and addressed by a public URL prefix.
#[derive(Debug, Clone)]
pub struct UploadStore {
	dir: PathBuf,
	url_prefix: String,
}
impl UploadStore {
	pub fn new(cfg: &medscribe_config::Uploads) -> Self {
		Self::from_parts(cfg.dir.clone(), &cfg.url_prefix)
	}

	pub fn from_parts(dir: PathBuf, url_prefix: &str) -> Self {
		Self { dir, url_prefix: url_prefix.trim_end_matches('/').to_string() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn url_prefix(&self) -> &str {
		&self.url_prefix
	}

	pub async fn ensure_dir(&self) -> Result<()> {
		tokio::fs::create_dir_all(&self.dir).await?;

		Ok(())
	}

	pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredAudio> {
		let file_name = format!("{}-{}", Uuid::new_v4(), clean_file_name(original_name));

		self.ensure_dir().await?;
		tokio::fs::write(self.dir.join(&file_name), bytes).await?;

		let url = format!("{}/{file_name}", self.url_prefix);

		Ok(StoredAudio { file_name, url })
	}

	/// Deletes the file behind a URL produced by [`UploadStore::save`].
	///
	/// Returns `false` when the file was already gone.
	pub async fn remove_url(&self, url: &str) -> Result<bool> {
		let file_name = self.file_name_for(url)?;

		match tokio::fs::remove_file(self.dir.join(file_name)).await {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}

	fn file_name_for<'a>(&self, url: &'a str) -> Result<&'a str> {
		let name = url
			.strip_prefix(self.url_prefix.as_str())
			.and_then(|rest| rest.strip_prefix('/'))
			.ok_or_else(|| Error::InvalidArgument(format!("{url} is not an upload URL")))?;

		if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
			return Err(Error::InvalidArgument(format!("{url} is not an upload URL")));
		}

		Ok(name)
	}
}

/// Keeps the final path component and replaces anything outside `[A-Za-z0-9._-]`.
pub fn clean_file_name(original: &str) -> String {
	let last = original.rsplit(['/', '\\']).next().unwrap_or_default();
	let cleaned = last
		.chars()
		.map(|ch| if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') { ch } else { '_' })
		.collect::<String>();

	if cleaned.trim_matches('.').is_empty() { FALLBACK_NAME.to_string() } else { cleaned }
}
