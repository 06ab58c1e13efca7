use chrono::{DateTime, NaiveDate, Utc};

use keeper_utils::parse::parse_iso_date;

/// Inclusive calendar-day window. Open ends are unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    #[error("❌ Invalid date '{0}'. Use the YYYY-MM-DD format.")]
    Malformed(String),
    #[error("❌ End date ({end}) cannot be earlier than start date ({start}).")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Parse optional `YYYY-MM-DD` bounds and reject reversed ranges.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DateRangeError> {
        let start = start.map(parse_bound).transpose()?;
        let end = end.map(parse_bound).transpose()?;

        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(DateRangeError::EndBeforeStart { start, end });
        }

        Ok(Self { start, end })
    }

    /// Whether a UTC timestamp falls on a day inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();

        self.start.is_none_or(|start| start <= day) && self.end.is_none_or(|end| day <= end)
    }
}

fn parse_bound(raw: &str) -> Result<NaiveDate, DateRangeError> {
    parse_iso_date(raw).ok_or_else(|| DateRangeError::Malformed(raw.trim().to_owned()))
}
