use axum::{
	Json, Router,
	extract::{
		DefaultBodyLimit, Multipart, Path, State,
		multipart::{MultipartError, MultipartRejection},
		rejection::JsonRejection,
	},
	http::{HeaderValue, Method, StatusCode, header},
	middleware,
	routing::{get, post},
};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	services::ServeDir,
	trace::TraceLayer,
};

use crate::{error::ApiError, rate_limit, safety, state::AppState};
use medscribe_domain::safety::NoteText;
use medscribe_service::{
	AudioUpload, CreateNoteRequest, CreatePatientRequest, DeleteResponse, NoteDetailView,
	NoteSummaryView, PatientDetailView, PatientView,
};

pub const MSG_AUDIO_ONLY: &str = "Only audio files are allowed";
pub const MSG_AUDIO_TOO_LARGE: &str = "Audio file exceeds the upload size limit";

const DEFAULT_AUDIO_NAME: &str = "recording";
/// Room for the non-file form fields and multipart framing on top of the audio ceiling.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Serialize)]
struct HealthResponse {
	status: &'static str,
	#[serde(with = "medscribe_service::time_serde")]
	timestamp: OffsetDateTime,
}

#[derive(Debug, Default)]
struct NoteForm {
	patient_id: Option<String>,
	text: NoteText,
	audio: Option<AudioUpload>,
}

pub fn router(state: AppState) -> Router {
	let max_audio_bytes = state.service.cfg.storage.uploads.max_audio_bytes;
	let form_limit =
		usize::try_from(max_audio_bytes.saturating_add(FORM_OVERHEAD_BYTES)).unwrap_or(usize::MAX);
	let upload_limit =
		middleware::from_fn_with_state(state.upload_limiter.clone(), rate_limit::enforce);
	let api_limit = middleware::from_fn_with_state(state.api_limiter.clone(), rate_limit::enforce);
	let audio_files = ServeDir::new(state.service.uploads.dir());
	let audio_prefix = state.service.uploads.url_prefix().to_string();
	let cors = cors_layer(&state.service.cfg.service.cors_origins);
	let create_note_route =
		post(create_note).layer(DefaultBodyLimit::max(form_limit)).layer(upload_limit);

	Router::new()
		.route("/health", get(health))
		.route("/api/patients", get(list_patients).post(create_patient))
		.route("/api/patients/{id}", get(get_patient).delete(delete_patient))
		.route("/api/notes", get(list_notes).merge(create_note_route))
		.route("/api/notes/{id}", get(get_note).delete(delete_note))
		.nest_service(&audio_prefix, audio_files)
		.layer(api_limit)
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn health() -> Json<HealthResponse> {
	Json(HealthResponse { status: "OK", timestamp: OffsetDateTime::now_utc() })
}

async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<PatientView>>, ApiError> {
	let patients = state
		.service
		.list_patients()
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to fetch patients"))?;

	Ok(Json(patients))
}

async fn create_patient(
	State(state): State<AppState>,
	payload: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientView>), ApiError> {
	let Json(payload) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
	let patient = state
		.service
		.create_patient(payload)
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to create patient"))?;

	Ok((StatusCode::CREATED, Json(patient)))
}

async fn get_patient(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<PatientDetailView>, ApiError> {
	let patient = state
		.service
		.get_patient(&id)
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to fetch patient"))?;

	Ok(Json(patient))
}

async fn delete_patient(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let response = state
		.service
		.delete_patient(&id)
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to delete patient"))?;

	Ok(Json(response))
}

async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<NoteSummaryView>>, ApiError> {
	let notes = state
		.service
		.list_notes()
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to fetch notes"))?;

	Ok(Json(notes))
}

async fn create_note(
	State(state): State<AppState>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<NoteSummaryView>), ApiError> {
	let multipart = multipart.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
	let max_audio_bytes = state.service.cfg.storage.uploads.max_audio_bytes;
	let NoteForm { patient_id, mut text, audio } = read_note_form(multipart, max_audio_bytes).await?;

	safety::screen(&mut text)?;

	let req = CreateNoteRequest { patient_id, content: text.content, audio };
	let note = state
		.service
		.create_note(req)
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to create note"))?;

	Ok((StatusCode::CREATED, Json(note)))
}

async fn get_note(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<NoteDetailView>, ApiError> {
	let note = state
		.service
		.get_note(&id)
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to fetch note"))?;

	Ok(Json(note))
}

async fn delete_note(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let response = state
		.service
		.delete_note(&id)
		.await
		.map_err(|err| ApiError::from_service(err, "Failed to delete note"))?;

	Ok(Json(response))
}

async fn read_note_form(mut multipart: Multipart, max_audio_bytes: u64) -> Result<NoteForm, ApiError> {
	let mut form = NoteForm::default();

	while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
		let name = field.name().unwrap_or_default().to_string();

		match name.as_str() {
			"patientId" => form.patient_id = Some(field.text().await.map_err(multipart_error)?),
			"content" => form.text.content = Some(field.text().await.map_err(multipart_error)?),
			"transcription" =>
				form.text.transcription = Some(field.text().await.map_err(multipart_error)?),
			"audioFile" => {
				// Browsers send an empty, nameless part when no file was chosen.
				if field.file_name() == Some("") {
					continue;
				}

				let content_type = field.content_type().map(str::to_string);

				if !content_type.as_deref().is_some_and(|value| value.starts_with("audio/")) {
					tracing::warn!(content_type = ?content_type, "Rejected non-audio upload.");

					return Err(ApiError::bad_request(MSG_AUDIO_ONLY));
				}

				let file_name = field.file_name().unwrap_or(DEFAULT_AUDIO_NAME).to_string();
				let bytes = field.bytes().await.map_err(multipart_error)?;

				if bytes.len() as u64 > max_audio_bytes {
					return Err(ApiError::payload_too_large(MSG_AUDIO_TOO_LARGE));
				}

				form.audio = Some(AudioUpload { file_name, content_type, bytes: bytes.to_vec() });
			},
			_ => {},
		}
	}

	Ok(form)
}

fn multipart_error(err: MultipartError) -> ApiError {
	if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
		ApiError::payload_too_large(MSG_AUDIO_TOO_LARGE)
	} else {
		ApiError::bad_request(err.body_text())
	}
}

fn cors_layer(origins: &[String]) -> CorsLayer {
	let origins = origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(err) => {
				tracing::warn!(%origin, error = %err, "Ignoring invalid CORS origin.");

				None
			},
		})
		.collect::<Vec<_>>();

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST, Method::DELETE])
		.allow_headers([header::CONTENT_TYPE])
		.allow_credentials(true)
}
