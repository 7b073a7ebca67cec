use medscribe_domain::{safety::SuspiciousInput, submission::SubmissionReject};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { message: String },
	#[error("{message}")]
	NotFound { message: String },
	#[error("{message}")]
	SecurityRejection { message: String },
	#[error("External service error: {message}")]
	ExternalService { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation { message: message.into() }
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}

	/// True for failures the caller caused and can fix by changing the request.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::Validation { .. } | Self::NotFound { .. } | Self::SecurityRejection { .. })
	}

	/// Maps a storage error, replacing the storage-level not-found text with `not_found`.
	pub(crate) fn from_storage(err: medscribe_storage::Error, not_found: &str) -> Self {
		match err {
			medscribe_storage::Error::NotFound(_) => Self::not_found(not_found),
			other => other.into(),
		}
	}
}

impl From<medscribe_storage::Error> for Error {
	fn from(err: medscribe_storage::Error) -> Self {
		match err {
			medscribe_storage::Error::NotFound(message) => Self::NotFound { message },
			medscribe_storage::Error::InvalidArgument(message) => Self::Validation { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<medscribe_providers::Error> for Error {
	fn from(err: medscribe_providers::Error) -> Self {
		Self::ExternalService { message: err.to_string() }
	}
}

impl From<SubmissionReject> for Error {
	fn from(reject: SubmissionReject) -> Self {
		Self::validation(reject.message())
	}
}

impl From<SuspiciousInput> for Error {
	fn from(reject: SuspiciousInput) -> Self {
		Self::SecurityRejection { message: reject.message().to_string() }
	}
}
