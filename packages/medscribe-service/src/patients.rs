use serde::{Deserialize, Serialize};

use crate::{
	DeleteResponse, Error, MedscribeService, NoteSummaryView, PatientDetailView, PatientSummary,
	PatientView, Result,
};
use medscribe_domain::birth_date;
use medscribe_storage::{models::NewPatient, notes, patients};

pub const MSG_REQUIRED_FIELDS: &str = "First name, last name, and date of birth are required";
pub const MSG_INVALID_BIRTH_DATE: &str = "Date of birth must be a YYYY-MM-DD date";
pub const MSG_PATIENT_NOT_FOUND: &str = "Patient not found";
pub const MSG_PATIENT_DELETED: &str = "Patient and associated notes deleted successfully";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	/// `YYYY-MM-DD`, or an RFC 3339 timestamp whose calendar date is used.
	pub date_of_birth: Option<String>,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub address: Option<String>,
}
impl CreatePatientRequest {
	fn into_new_patient(self) -> Result<NewPatient> {
		let (Some(first_name), Some(last_name), Some(raw_dob)) =
			(non_blank(self.first_name), non_blank(self.last_name), non_blank(self.date_of_birth))
		else {
			return Err(Error::validation(MSG_REQUIRED_FIELDS));
		};
		let date_of_birth =
			birth_date::parse(&raw_dob).map_err(|_| Error::validation(MSG_INVALID_BIRTH_DATE))?;

		Ok(NewPatient {
			first_name,
			last_name,
			date_of_birth,
			email: non_blank(self.email),
			phone: non_blank(self.phone),
			address: non_blank(self.address),
		})
	}
}

impl MedscribeService {
	pub async fn create_patient(&self, req: CreatePatientRequest) -> Result<PatientView> {
		let new_patient = req.into_new_patient()?;
		let patient = patients::insert_patient(&self.db, &new_patient).await?;

		tracing::info!(
			patient_id = %patient.patient_id,
			patient_code = %patient.patient_code,
			"Patient created."
		);

		Ok(patient.into())
	}

	pub async fn list_patients(&self) -> Result<Vec<PatientView>> {
		let patients = patients::list_patients(&self.db).await?;

		Ok(patients.into_iter().map(PatientView::from).collect())
	}

	/// Fetches one patient with all of their notes, newest first.
	pub async fn get_patient(&self, id: &str) -> Result<PatientDetailView> {
		let patient_id = crate::parse_id(id, MSG_PATIENT_NOT_FOUND)?;
		let patient = patients::find_patient(&self.db.pool, patient_id)
			.await
			.map_err(|err| Error::from_storage(err, MSG_PATIENT_NOT_FOUND))?;
		let summary = PatientSummary::from(&patient);
		let notes = notes::list_notes_for_patient(&self.db, patient_id)
			.await?
			.into_iter()
			.map(|note| NoteSummaryView::new(note, summary.clone()))
			.collect();

		Ok(PatientDetailView { patient: patient.into(), notes })
	}

	/// Deletes the patient and every note in one transaction, then releases stored audio.
	pub async fn delete_patient(&self, id: &str) -> Result<DeleteResponse> {
		let patient_id = crate::parse_id(id, MSG_PATIENT_NOT_FOUND)?;
		let removed = patients::delete_patient(&self.db, patient_id)
			.await
			.map_err(|err| Error::from_storage(err, MSG_PATIENT_NOT_FOUND))?;

		for url in removed.iter().filter_map(|note| note.audio_url.as_deref()) {
			self.discard_audio(url).await;
		}

		tracing::info!(%patient_id, notes = removed.len(), "Patient deleted.");

		Ok(DeleteResponse::new(MSG_PATIENT_DELETED))
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
