use medscribe_domain::safety::{self, NoteText};
use medscribe_service::Error;

/// Screens inbound free text before the note workflow sees it.
///
/// Any suspicious match drops the whole request. Otherwise both fields are sanitized in place.
pub fn screen(text: &mut NoteText) -> Result<(), Error> {
	safety::guard(text).map_err(|reject| {
		tracing::warn!(
			field = reject.field.as_str(),
			pattern = reject.pattern,
			"Rejected note submission with suspicious input."
		);

		Error::from(reject)
	})
}
