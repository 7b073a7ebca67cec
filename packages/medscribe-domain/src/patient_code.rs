//! Human-facing patient codes of the form `PAT-XXXXXXXX` (uppercase hex).

use uuid::Uuid;

pub const PREFIX: &str = "PAT-";
pub const HEX_LEN: usize = 8;

/// Draws a fresh code from a v4 UUID. Uniqueness is enforced by the store, callers retry on
/// conflict.
pub fn generate() -> String {
	let raw = Uuid::new_v4().simple().to_string();

	format!("{PREFIX}{}", raw[..HEX_LEN].to_ascii_uppercase())
}

pub fn is_valid(code: &str) -> bool {
	let Some(hex) = code.strip_prefix(PREFIX) else {
		return false;
	};

	hex.len() == HEX_LEN && hex.chars().all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch))
}
