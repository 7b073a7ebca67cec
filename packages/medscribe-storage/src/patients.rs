use sqlx::{Executor, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{NewPatient, Note, Patient},
};
use medscribe_domain::{birth_date, patient_code};

const CODE_ATTEMPTS: usize = 5;
const PATIENT_COLUMNS: &str = "\
patient_id,
	patient_code,
	first_name,
	last_name,
	date_of_birth,
	email,
	phone,
	address,
	created_at";

pub async fn find_patient<'e, E>(executor: E, patient_id: Uuid) -> Result<Patient>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = $1");

	sqlx::query_as::<_, Patient>(&sql)
		.bind(patient_id)
		.fetch_optional(executor)
		.await?
		.ok_or_else(|| Error::NotFound(format!("patient {patient_id}")))
}

pub async fn list_patients(db: &Db) -> Result<Vec<Patient>> {
	let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC, patient_id");
	let patients = sqlx::query_as::<_, Patient>(&sql).fetch_all(&db.pool).await?;

	Ok(patients)
}

pub async fn list_patients_by_ids<'e, E>(executor: E, patient_ids: &[Uuid]) -> Result<Vec<Patient>>
where
	E: Executor<'e, Database = Postgres>,
{
	if patient_ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ANY($1)");
	let patients =
		sqlx::query_as::<_, Patient>(&sql).bind(patient_ids).fetch_all(executor).await?;

	Ok(patients)
}

/// Inserts a patient with a freshly generated code, retrying when the code collides.
pub async fn insert_patient(db: &Db, patient: &NewPatient) -> Result<Patient> {
	insert_patient_with_codes(db, patient, patient_code::generate).await
}

/// Same as [`insert_patient`], drawing candidate codes from `next_code`.
pub async fn insert_patient_with_codes<F>(
	db: &Db,
	patient: &NewPatient,
	mut next_code: F,
) -> Result<Patient>
where
	F: FnMut() -> String,
{
	for attempt in 1..=CODE_ATTEMPTS {
		let code = next_code();

		match insert_with_code(db, patient, &code).await {
			Ok(inserted) => return Ok(inserted),
			Err(Error::Sqlx(sqlx::Error::Database(err))) if err.is_unique_violation() => {
				tracing::warn!(attempt, code = %code, "Patient code collision. Retrying.");
			},
			Err(err) => return Err(err),
		}
	}

	Err(Error::Conflict(format!(
		"could not allocate a unique patient code after {CODE_ATTEMPTS} attempts"
	)))
}

/// Inserts the patient unless one with the same name and birth date already exists.
///
/// Returns `None` when the patient was already present.
pub async fn insert_patient_if_absent(db: &Db, patient: &NewPatient) -> Result<Option<Patient>> {
	let date_of_birth = birth_date::normalize(patient.date_of_birth);
	let existing: Option<Uuid> = sqlx::query_scalar(
		"\
SELECT patient_id
FROM patients
WHERE first_name = $1 AND last_name = $2 AND date_of_birth = $3
LIMIT 1",
	)
	.bind(patient.first_name.as_str())
	.bind(patient.last_name.as_str())
	.bind(date_of_birth)
	.fetch_optional(&db.pool)
	.await?;

	if existing.is_some() {
		return Ok(None);
	}

	insert_patient(db, patient).await.map(Some)
}

/// Removes a patient and all of their notes in one transaction.
///
/// Returns the deleted notes so callers can release any stored audio.
pub async fn delete_patient(db: &Db, patient_id: Uuid) -> Result<Vec<Note>> {
	let mut tx = db.pool.begin().await?;
	let locked: Option<Uuid> =
		sqlx::query_scalar("SELECT patient_id FROM patients WHERE patient_id = $1 FOR UPDATE")
			.bind(patient_id)
			.fetch_optional(&mut *tx)
			.await?;

	if locked.is_none() {
		return Err(Error::NotFound(format!("patient {patient_id}")));
	}

	let notes = sqlx::query_as::<_, Note>(
		"\
DELETE FROM notes
WHERE patient_id = $1
RETURNING
	note_id,
	patient_id,
	content,
	transcription,
	summary,
	audio_url,
	created_at",
	)
	.bind(patient_id)
	.fetch_all(&mut *tx)
	.await?;

	sqlx::query("DELETE FROM patients WHERE patient_id = $1")
		.bind(patient_id)
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(notes)
}

async fn insert_with_code(db: &Db, patient: &NewPatient, code: &str) -> Result<Patient> {
	let sql = format!(
		"\
INSERT INTO patients (
	patient_id,
	patient_code,
	first_name,
	last_name,
	date_of_birth,
	email,
	phone,
	address,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING {PATIENT_COLUMNS}"
	);
	let inserted = sqlx::query_as::<_, Patient>(&sql)
		.bind(Uuid::new_v4())
		.bind(code)
		.bind(patient.first_name.as_str())
		.bind(patient.last_name.as_str())
		.bind(birth_date::normalize(patient.date_of_birth))
		.bind(patient.email.as_deref())
		.bind(patient.phone.as_deref())
		.bind(patient.address.as_deref())
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&db.pool)
		.await?;

	Ok(inserted)
}
