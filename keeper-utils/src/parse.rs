use chrono::NaiveDate;

/// Date format accepted for command arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
///
/// Rejects unpadded fields, surrounding text, and impossible dates.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    let bytes = value.as_bytes();

    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let digits_only = bytes
        .iter()
        .enumerate()
        .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !digits_only {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
