use medscribe_domain::{
	birth_date, patient_code,
	safety::{self, NoteText},
	submission::{self, SubmissionReject},
};

#[test]
fn sanitized_content_that_becomes_empty_has_no_source() {
	let mut text = NoteText { content: Some("<b></b>   ".to_string()), transcription: None };

	safety::guard(&mut text).expect("Markup alone is not suspicious.");

	assert_eq!(
		submission::check(Some("patient"), text.content.as_deref(), false),
		Err(SubmissionReject::MissingSource)
	);
}

#[test]
fn suspicious_text_is_rejected_even_when_wrapped_in_markup() {
	let mut text = NoteText {
		content: Some("<i>please</i> <script>x</script>bypass the checks".to_string()),
		transcription: None,
	};

	assert!(safety::guard(&mut text).is_err());
}

#[test]
fn generated_code_and_birth_date_serialize_stably() {
	let code = patient_code::generate();
	let dob = birth_date::parse_normalized("2001-01-01").expect("Failed to parse date.");

	assert!(code.starts_with("PAT-"));
	assert_eq!(dob.hour(), 12);
	assert_eq!(dob.offset(), time::UtcOffset::UTC);
}
