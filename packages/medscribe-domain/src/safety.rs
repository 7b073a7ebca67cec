//! Input gate for free-text note fields.
//!
//! Two independent checks: a phrase scan that rejects likely prompt-injection attempts, and a
//! sanitizer that strips markup. [`guard`] runs the scan on the raw text first, then sanitizes.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

const SUSPICIOUS_PATTERNS: [&str; 13] = [
	r"(?i)ignore\s+previous\s+instructions",
	r"(?i)system\s+prompt",
	r"(?i)jailbreak",
	r"(?i)roleplay",
	r"(?i)pretend\s+to\s+be",
	r"(?i)act\s+as\s+if",
	r"(?i)you\s+are\s+now",
	r"(?i)forget\s+everything",
	r"(?i)new\s+instructions",
	r"(?i)override",
	r"(?i)bypass",
	r"(?i)hack",
	r"(?i)exploit",
];

// Constant patterns. A compile failure panics on first use, so the scan never passes silently.
static SUSPICIOUS: LazyLock<RegexSet> = LazyLock::new(|| {
	RegexSet::new(SUSPICIOUS_PATTERNS).expect("Suspicious phrase patterns must compile.")
});
static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?is)<script\b.*?</script\s*>").expect("Script block pattern must compile.")
});
static MARKUP_TAG: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Markup tag pattern must compile."));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedField {
	Content,
	Transcription,
}
impl GuardedField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Content => "content",
			Self::Transcription => "transcription",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousInput {
	pub field: GuardedField,
	/// Source of the first pattern that matched.
	pub pattern: &'static str,
}
impl SuspiciousInput {
	/// Client-facing explanation. Never echoes the matched text.
	pub fn message(&self) -> &'static str {
		match self.field {
			GuardedField::Content =>
				"Invalid input detected. Please provide valid medical notes only.",
			GuardedField::Transcription =>
				"Invalid transcription detected. Please provide valid medical notes only.",
		}
	}
}

/// Free-text fields of an inbound note submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteText {
	pub content: Option<String>,
	pub transcription: Option<String>,
}

/// Returns the first suspicious pattern found in `text`, if any.
pub fn find_suspicious(text: &str) -> Option<&'static str> {
	SUSPICIOUS.matches(text).iter().next().map(|idx| SUSPICIOUS_PATTERNS[idx])
}

pub fn is_suspicious(text: &str) -> bool {
	find_suspicious(text).is_some()
}

/// Removes script blocks, then any remaining tags, then surrounding whitespace. Idempotent.
pub fn sanitize(text: &str) -> String {
	let without_scripts = SCRIPT_BLOCK.replace_all(text, "");

	MARKUP_TAG.replace_all(&without_scripts, "").trim().to_string()
}

/// Rejects the whole submission on any suspicious match, otherwise sanitizes both fields in
/// place. Content is checked before transcription.
pub fn guard(text: &mut NoteText) -> Result<(), SuspiciousInput> {
	for (field, value) in [
		(GuardedField::Content, text.content.as_deref()),
		(GuardedField::Transcription, text.transcription.as_deref()),
	] {
		if let Some(pattern) = value.and_then(find_suspicious) {
			return Err(SuspiciousInput { field, pattern });
		}
	}

	for value in [&mut text.content, &mut text.transcription].into_iter().flatten() {
		*value = sanitize(value);
	}

	Ok(())
}
