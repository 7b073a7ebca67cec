pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider {provider} has no API key configured.")]
	MissingCredential { provider: String },
	#[error("Transcription failed: {message}")]
	TranscriptionFailed { message: String },
	#[error("Summarization failed: {message}")]
	SummarizationFailed { message: String },
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// Folds transport and parsing errors into the operation's failure kind. Missing credentials
	/// stay distinct.
	pub(crate) fn into_transcription_failure(self) -> Self {
		match self {
			Self::MissingCredential { .. } | Self::TranscriptionFailed { .. } => self,
			other => Self::TranscriptionFailed { message: other.to_string() },
		}
	}

	pub(crate) fn into_summarization_failure(self) -> Self {
		match self {
			Self::MissingCredential { .. } | Self::SummarizationFailed { .. } => self,
			other => Self::SummarizationFailed { message: other.to_string() },
		}
	}
}
