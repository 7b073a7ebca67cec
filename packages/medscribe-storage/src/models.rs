use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Patient {
	pub patient_id: Uuid,
	pub patient_code: String,
	pub first_name: String,
	pub last_name: String,
	pub date_of_birth: OffsetDateTime,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub address: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Note {
	pub note_id: Uuid,
	pub patient_id: Uuid,
	pub content: String,
	pub transcription: Option<String>,
	pub summary: Option<String>,
	pub audio_url: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPatient {
	pub first_name: String,
	pub last_name: String,
	pub date_of_birth: Date,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNote {
	pub patient_id: Uuid,
	pub content: String,
	pub transcription: Option<String>,
	pub summary: Option<String>,
	pub audio_url: Option<String>,
}

/// A note joined with the patient it belongs to.
#[derive(Debug, Clone)]
pub struct NoteRecord {
	pub note: Note,
	pub patient: Patient,
}
