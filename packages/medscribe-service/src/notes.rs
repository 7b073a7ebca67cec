use uuid::Uuid;

use crate::{
	DeleteResponse, Error, MedscribeService, NoteDetailView, NoteSummaryView, PatientSummary,
	Result, patients::MSG_PATIENT_NOT_FOUND,
};
use medscribe_domain::submission;
use medscribe_storage::{
	models::{NewNote, Patient},
	notes, patients,
	uploads::StoredAudio,
};

pub const MSG_NOTE_NOT_FOUND: &str = "Note not found";
pub const MSG_NOTE_DELETED: &str = "Note deleted successfully";

/// An audio recording attached to a note submission.
#[derive(Clone, Debug)]
pub struct AudioUpload {
	pub file_name: String,
	pub content_type: Option<String>,
	pub bytes: Vec<u8>,
}

/// A note submission after the safety guard has run over its free text.
#[derive(Clone, Debug, Default)]
pub struct CreateNoteRequest {
	pub patient_id: Option<String>,
	pub content: Option<String>,
	pub audio: Option<AudioUpload>,
}

impl MedscribeService {
	/// Validates, resolves the patient, stores and processes audio, then persists the note.
	///
	/// Nothing is written when validation or patient lookup fails. When processing or the insert
	/// fails after audio was stored, the file is removed again.
	pub async fn create_note(&self, req: CreateNoteRequest) -> Result<NoteSummaryView> {
		submission::check(req.patient_id.as_deref(), req.content.as_deref(), req.audio.is_some())?;

		let patient = self.resolve_patient(req.patient_id.as_deref().unwrap_or_default()).await?;
		let stored = match req.audio.as_ref() {
			Some(audio) => Some(self.uploads.save(&audio.file_name, &audio.bytes).await?),
			None => None,
		};

		match self.process_and_insert(&patient, &req, stored.as_ref()).await {
			Ok(view) => Ok(view),
			Err(err) => {
				if let Some(stored) = stored.as_ref() {
					self.discard_audio(&stored.url).await;
				}

				Err(err)
			},
		}
	}

	pub async fn list_notes(&self) -> Result<Vec<NoteSummaryView>> {
		let records = notes::list_notes(&self.db).await?;

		Ok(records.into_iter().map(NoteSummaryView::from).collect())
	}

	pub async fn get_note(&self, id: &str) -> Result<NoteDetailView> {
		let note_id = crate::parse_id(id, MSG_NOTE_NOT_FOUND)?;
		let record = notes::find_note(&self.db, note_id)
			.await
			.map_err(|err| Error::from_storage(err, MSG_NOTE_NOT_FOUND))?;

		Ok(record.into())
	}

	pub async fn delete_note(&self, id: &str) -> Result<DeleteResponse> {
		let note_id = crate::parse_id(id, MSG_NOTE_NOT_FOUND)?;
		let note = notes::delete_note(&self.db, note_id)
			.await
			.map_err(|err| Error::from_storage(err, MSG_NOTE_NOT_FOUND))?;

		if let Some(url) = note.audio_url.as_deref() {
			self.discard_audio(url).await;
		}

		tracing::info!(%note_id, "Note deleted.");

		Ok(DeleteResponse::new(MSG_NOTE_DELETED))
	}

	async fn resolve_patient(&self, raw_id: &str) -> Result<Patient> {
		let patient_id: Uuid = crate::parse_id(raw_id, MSG_PATIENT_NOT_FOUND)?;

		patients::find_patient(&self.db.pool, patient_id)
			.await
			.map_err(|err| Error::from_storage(err, MSG_PATIENT_NOT_FOUND))
	}

	async fn process_and_insert(
		&self,
		patient: &Patient,
		req: &CreateNoteRequest,
		stored: Option<&StoredAudio>,
	) -> Result<NoteSummaryView> {
		let processed = self.process(req.content.as_deref(), req.audio.as_ref()).await.inspect_err(
			|err| {
				tracing::error!(
					error = %err,
					patient_id = %patient.patient_id,
					has_audio = stored.is_some(),
					"Note processing failed."
				);
			},
		)?;
		let new_note = NewNote {
			patient_id: patient.patient_id,
			content: req.content.clone().unwrap_or_default(),
			transcription: processed.transcription,
			summary: processed.summary,
			audio_url: stored.map(|stored| stored.url.clone()),
		};
		let note = notes::insert_note(&self.db, &new_note).await?;

		tracing::info!(
			note_id = %note.note_id,
			patient_id = %patient.patient_id,
			has_audio = note.audio_url.is_some(),
			"Note created."
		);

		Ok(NoteSummaryView::new(note, PatientSummary::from(patient)))
	}
}
