use crate::{MedscribeService, Result, notes::AudioUpload};

/// What the AI adapter produced for one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessedNote {
	pub transcription: Option<String>,
	pub summary: Option<String>,
}

impl MedscribeService {
	/// Transcribes the audio when present, then summarizes the transcription, or the content when
	/// there is no transcription. Produces no summary when there is no text at all.
	pub async fn process(
		&self,
		content: Option<&str>,
		audio: Option<&AudioUpload>,
	) -> Result<ProcessedNote> {
		let transcription = match audio {
			Some(audio) => Some(
				self.providers
					.transcription
					.transcribe(&self.cfg.providers.transcription, &audio.bytes, &audio.file_name)
					.await?,
			),
			None => None,
		};
		let source = transcription
			.as_deref()
			.filter(|text| !text.trim().is_empty())
			.or_else(|| content.filter(|text| !text.trim().is_empty()));
		let summary = match source {
			Some(text) =>
				Some(self.providers.summary.summarize(&self.cfg.providers.summary, text).await?),
			None => None,
		};

		Ok(ProcessedNote { transcription, summary })
	}
}
