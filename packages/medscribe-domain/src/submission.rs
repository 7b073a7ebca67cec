/// Why a note submission cannot proceed. Checked before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionReject {
	MissingPatient,
	MissingSource,
}
impl SubmissionReject {
	pub fn message(self) -> &'static str {
		match self {
			Self::MissingPatient => "Patient ID is required",
			Self::MissingSource => "Either content or audio file is required",
		}
	}
}

/// A note needs a patient and at least one of non-empty content or audio.
pub fn check(
	patient_id: Option<&str>,
	content: Option<&str>,
	has_audio: bool,
) -> Result<(), SubmissionReject> {
	if patient_id.map(|id| id.trim().is_empty()).unwrap_or(true) {
		return Err(SubmissionReject::MissingPatient);
	}
	if !has_audio && content.map(str::is_empty).unwrap_or(true) {
		return Err(SubmissionReject::MissingSource);
	}

	Ok(())
}
