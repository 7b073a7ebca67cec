use time::{
	Date, OffsetDateTime,
	format_description::well_known::Rfc3339,
	macros::{format_description, time},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBirthDate {
	pub raw: String,
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. Only the calendar date is kept.
pub fn parse(raw: &str) -> Result<Date, InvalidBirthDate> {
	let trimmed = raw.trim();

	if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
		return Ok(date);
	}
	if let Ok(ts) = OffsetDateTime::parse(trimmed, &Rfc3339) {
		return Ok(ts.date());
	}

	Err(InvalidBirthDate { raw: raw.to_string() })
}

/// Pins a calendar date to 12:00 UTC.
///
/// Clients west or east of UTC render a midnight timestamp as the previous or next day; midday
/// keeps the rendered date stable within ±12 hours.
pub fn normalize(date: Date) -> OffsetDateTime {
	date.with_time(time!(12:00)).assume_utc()
}

pub fn parse_normalized(raw: &str) -> Result<OffsetDateTime, InvalidBirthDate> {
	parse(raw).map(normalize)
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn calendar_date_lands_at_midday_utc() {
		let ts = parse_normalized("1990-07-22").expect("Failed to parse date.");

		assert_eq!(ts, datetime!(1990-07-22 12:00 UTC));
	}

	#[test]
	fn timestamp_keeps_its_calendar_date() {
		let ts = parse_normalized("1995-05-15T00:00:00.000Z").expect("Failed to parse timestamp.");

		assert_eq!(ts, datetime!(1995-05-15 12:00 UTC));
	}

	#[test]
	fn rejects_garbage() {
		assert!(parse("22/07/1990").is_err());
		assert!(parse("").is_err());
		assert!(parse("1990-13-01").is_err());
	}
}
