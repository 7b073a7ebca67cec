use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use medscribe_storage::models::{Note, NoteRecord, Patient};

/// The patient fields embedded in every note.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
	pub id: Uuid,
	pub first_name: String,
	pub last_name: String,
	/// Display code, `PAT-` followed by eight uppercase hex digits.
	pub patient_id: String,
	#[serde(with = "crate::time_serde")]
	pub date_of_birth: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientView {
	pub id: Uuid,
	pub first_name: String,
	pub last_name: String,
	pub patient_id: String,
	#[serde(with = "crate::time_serde")]
	pub date_of_birth: OffsetDateTime,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub address: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetailView {
	#[serde(flatten)]
	pub patient: PatientView,
	pub notes: Vec<NoteSummaryView>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView<P> {
	pub id: Uuid,
	pub content: String,
	pub transcription: Option<String>,
	pub summary: Option<String>,
	pub audio_url: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub patient: P,
}

pub type NoteSummaryView = NoteView<PatientSummary>;

/// A single note with the patient's contact fields included.
pub type NoteDetailView = NoteView<PatientView>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub message: String,
}
impl DeleteResponse {
	pub fn new(message: &str) -> Self {
		Self { message: message.to_string() }
	}
}

impl From<&Patient> for PatientSummary {
	fn from(patient: &Patient) -> Self {
		Self {
			id: patient.patient_id,
			first_name: patient.first_name.clone(),
			last_name: patient.last_name.clone(),
			patient_id: patient.patient_code.clone(),
			date_of_birth: patient.date_of_birth,
		}
	}
}

impl From<Patient> for PatientView {
	fn from(patient: Patient) -> Self {
		Self {
			id: patient.patient_id,
			first_name: patient.first_name,
			last_name: patient.last_name,
			patient_id: patient.patient_code,
			date_of_birth: patient.date_of_birth,
			email: patient.email,
			phone: patient.phone,
			address: patient.address,
			created_at: patient.created_at,
		}
	}
}

impl<P> NoteView<P> {
	pub fn new(note: Note, patient: P) -> Self {
		Self {
			id: note.note_id,
			content: note.content,
			transcription: note.transcription,
			summary: note.summary,
			audio_url: note.audio_url,
			created_at: note.created_at,
			patient,
		}
	}
}

impl From<NoteRecord> for NoteSummaryView {
	fn from(record: NoteRecord) -> Self {
		let patient = PatientSummary::from(&record.patient);

		Self::new(record.note, patient)
	}
}

impl From<NoteRecord> for NoteDetailView {
	fn from(record: NoteRecord) -> Self {
		Self::new(record.note, PatientView::from(record.patient))
	}
}
