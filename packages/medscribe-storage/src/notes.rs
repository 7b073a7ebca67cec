use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{NewNote, Note, NoteRecord, Patient},
	patients,
};

const NOTE_COLUMNS: &str = "\
note_id,
	patient_id,
	content,
	transcription,
	summary,
	audio_url,
	created_at";

pub async fn insert_note(db: &Db, note: &NewNote) -> Result<Note> {
	let sql = format!(
		"\
INSERT INTO notes (
	note_id,
	patient_id,
	content,
	transcription,
	summary,
	audio_url,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING {NOTE_COLUMNS}"
	);
	let inserted = sqlx::query_as::<_, Note>(&sql)
		.bind(Uuid::new_v4())
		.bind(note.patient_id)
		.bind(note.content.as_str())
		.bind(note.transcription.as_deref())
		.bind(note.summary.as_deref())
		.bind(note.audio_url.as_deref())
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&db.pool)
		.await?;

	Ok(inserted)
}

pub async fn find_note(db: &Db, note_id: Uuid) -> Result<NoteRecord> {
	let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE note_id = $1");
	let note = sqlx::query_as::<_, Note>(&sql)
		.bind(note_id)
		.fetch_optional(&db.pool)
		.await?
		.ok_or_else(|| Error::NotFound(format!("note {note_id}")))?;
	let patient = patients::find_patient(&db.pool, note.patient_id).await?;

	Ok(NoteRecord { note, patient })
}

/// Lists every note, newest first, each joined with its patient.
pub async fn list_notes(db: &Db) -> Result<Vec<NoteRecord>> {
	let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, note_id");
	let notes = sqlx::query_as::<_, Note>(&sql).fetch_all(&db.pool).await?;

	attach_patients(db, notes).await
}

pub async fn list_notes_for_patient(db: &Db, patient_id: Uuid) -> Result<Vec<Note>> {
	let sql = format!(
		"SELECT {NOTE_COLUMNS} FROM notes WHERE patient_id = $1 ORDER BY created_at DESC, note_id"
	);
	let notes = sqlx::query_as::<_, Note>(&sql).bind(patient_id).fetch_all(&db.pool).await?;

	Ok(notes)
}

pub async fn delete_note(db: &Db, note_id: Uuid) -> Result<Note> {
	let sql = format!("DELETE FROM notes WHERE note_id = $1 RETURNING {NOTE_COLUMNS}");

	sqlx::query_as::<_, Note>(&sql)
		.bind(note_id)
		.fetch_optional(&db.pool)
		.await?
		.ok_or_else(|| Error::NotFound(format!("note {note_id}")))
}

async fn attach_patients(db: &Db, notes: Vec<Note>) -> Result<Vec<NoteRecord>> {
	let mut ids = notes.iter().map(|note| note.patient_id).collect::<Vec<_>>();

	ids.sort_unstable();
	ids.dedup();

	let by_id = patients::list_patients_by_ids(&db.pool, &ids)
		.await?
		.into_iter()
		.map(|patient| (patient.patient_id, patient))
		.collect::<HashMap<Uuid, Patient>>();
	let mut records = Vec::with_capacity(notes.len());

	for note in notes {
		let Some(patient) = by_id.get(&note.patient_id) else {
			tracing::warn!(note_id = %note.note_id, "Note references a missing patient. Skipping.");

			continue;
		};

		records.push(NoteRecord { patient: patient.clone(), note });
	}

	Ok(records)
}
